use std::io::{BufRead, Write};

use partition_core::{DuplicateDecider, DuplicateRecord, Resolution};
use partition_logging::partition_warn;

const PREVIEW_LIMIT: usize = 3;

/// Asks on a terminal whether duplicates are skipped or kept, once per run.
pub(crate) struct TerminalDecider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDecider<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, duplicates: &[DuplicateRecord]) -> std::io::Result<String> {
        writeln!(self.output, "\ndetected {} duplicate URLs.", duplicates.len())?;
        for record in duplicates.iter().take(PREVIEW_LIMIT) {
            writeln!(
                self.output,
                " - {} ({})",
                record.url,
                record.all_sources.join(", ")
            )?;
        }
        writeln!(
            self.output,
            "choose duplicate policy: [s]kip duplicates, [k]eep duplicates (skip default)"
        )?;
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> DuplicateDecider for TerminalDecider<R, W> {
    fn decide(&mut self, duplicates: &[DuplicateRecord]) -> Resolution {
        match self.ask(duplicates) {
            Ok(answer) => Resolution::from_answer(&answer),
            Err(err) => {
                partition_warn!("could not read duplicate policy answer, skipping: {}", err);
                Resolution::Skip
            }
        }
    }
}
