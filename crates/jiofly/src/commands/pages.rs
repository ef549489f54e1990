//! `jiofly pages`: the page catalogue.

use serde::Serialize;

use jiofly_api::Page;

use crate::cli::GlobalOpts;
use crate::output::{self, KeyRow};

#[derive(Serialize)]
struct PageInfo {
    page: Page,
    path: &'static str,
    facts: Vec<&'static str>,
}

pub fn handle(global: &GlobalOpts) {
    let infos: Vec<PageInfo> = Page::all()
        .map(|page| PageInfo {
            page,
            path: page.path(),
            facts: page.known_keys(),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &infos,
        |info| KeyRow {
            page: info.page.name(),
            path: info.path,
            facts: info.facts.join(", "),
        },
        |info| info.page.to_string(),
    );
    output::print_output(&out, global.quiet);
}
