// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("abbs-dep")
        .version(env!("CARGO_PKG_VERSION"))
        .author("AOSC Developers")
        .about("Compute the build order of abbs packages")
        .long_about(
            "Resolve dependencies for abbs trees.\n\n\
             Reads an abbs-meta database and prints the packages in build order, \
             one level per line. Exit status 2 indicates a dependency loop.",
        )
        .arg(
            Arg::new("packages")
                .value_name("PACKAGE")
                .required(true)
                .num_args(1..)
                .help("Packages to resolve"),
        )
        .arg(
            Arg::new("dbfile")
                .short('d')
                .long("dbfile")
                .value_name("PATH")
                .required(true)
                .help("Path to the abbs-meta database"),
        )
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .default_value("amd64")
                .help("Target architecture"),
        )
        .arg(
            Arg::new("no_builddep")
                .short('n')
                .long("no-builddep")
                .action(ArgAction::SetTrue)
                .help("Exclude build-time dependencies"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Print every walked dependency edge to stderr"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the result as JSON"),
        )
        .arg(
            Arg::new("with_versions")
                .long("with-versions")
                .action(ArgAction::SetTrue)
                .help("Print name==version for packages with a known version"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("abbs-dep.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
