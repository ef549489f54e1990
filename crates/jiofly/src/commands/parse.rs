//! `jiofly parse`: apply a page layout to a saved document.

use std::io::Read;

use jiofly_api::Page;

use crate::cli::{GlobalOpts, ParseArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ParseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let xml = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.file)?
    };

    let report = Page::from(args.page).parse(&xml);

    let color = output::should_color(&global.color);
    let out = output::render_pages(&global.output, &[report], color);
    output::print_output(&out, global.quiet);
    Ok(())
}
