use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir: PathBuf = std::env::var_os("OUT_DIR")
        .expect("OUT_DIR not set by Cargo")
        .into();
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    // One page per visible command path: floodwatch.1, floodwatch-nodes.1,
    // floodwatch-nodes-list.1, ...
    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let page = cmd.get_name().to_owned();
        write_page(&cmd, &man_dir.join(format!("{page}.1")));

        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{page}-{}", sub.get_name()))),
        );
    }
}

fn write_page(cmd: &clap::Command, path: &Path) {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut page)
        .unwrap_or_else(|e| panic!("rendering {}: {e}", path.display()));
    fs::write(path, page).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
}
