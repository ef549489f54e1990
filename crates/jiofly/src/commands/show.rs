//! `jiofly show`: fetch pages once and print their facts.

use tracing::warn;

use jiofly_api::PageFacts;

use crate::cli::{GlobalOpts, ShowArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::resolve(global)?;
    let client = super::device_client(&cfg)?;
    let pages = args.page.pages();

    let mut reports = Vec::with_capacity(pages.len());
    let mut first_err = None;

    for page in &pages {
        match client.page(*page).await {
            Ok(report) => reports.push(report),
            // A lone page surfaces its error directly.
            Err(e) if pages.len() == 1 => return Err(CliError::from_device(e, &cfg.device.url)),
            Err(e) => {
                warn!(%page, error = %e, "page fetch failed");
                reports.push(PageFacts::unavailable(*page));
                first_err.get_or_insert(e);
            }
        }
    }

    // Nothing answered: the device itself is unreachable.
    if let Some(e) = first_err {
        if reports.iter().all(|r| !r.is_available()) {
            return Err(CliError::from_device(e, &cfg.device.url));
        }
    }

    let color = output::should_color(&global.color);
    let out = output::render_pages(&global.output, &reports, color);
    output::print_output(&out, global.quiet);
    Ok(())
}
