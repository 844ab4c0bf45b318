// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Patchdeck CLI entrypoint.
//!
//! There are no flags or subcommands; invoking the binary launches the
//! interactive patchbay directly. Exits 0 on user quit, 1 when the terminal
//! cannot be initialized, 2 on unexpected arguments.

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program}\n\npatchdeck takes no flags; it launches the interactive ALSA/JACK patchbay.\n\nKeys: TAB switch focus, UP/DOWN navigate, c connect, d disconnect, r refresh, q quit."
    );
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<(), ()> {
    match args.next() {
        None => Ok(()),
        Some(_) => Err(()),
    }
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "patchdeck".to_owned());

    if parse_options(args).is_err() {
        print_usage(&program);
        std::process::exit(2);
    }

    if let Err(err) = patchdeck::tui::run() {
        eprintln!("patchdeck: {err}");
        std::process::exit(1);
    }
}
