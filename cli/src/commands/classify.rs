use std::process::ExitCode;

use colored::*;
use tracing::error;

use crate::terminal::print::{self, GLOBAL_KEY_WIDTH};
use exposr_common::network::range;

pub fn classify(ranges: &[String]) -> ExitCode {
    GLOBAL_KEY_WIDTH.set(ranges.iter().map(String::len).max().unwrap_or(0));

    let mut invalid = 0;
    for input in ranges {
        match range::is_public(input) {
            Ok(true) => print::aligned_line(input, "public".red().bold()),
            Ok(false) => print::aligned_line(input, "private".green()),
            Err(err) => {
                invalid += 1;
                error!("{err}");
            }
        }
    }

    if invalid > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}
