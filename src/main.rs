mod cat_file;
mod interface;

use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::Context;
use color_eyre::Result;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use minigit::repo::{Checkout, Merge, Repo};
use minigit::util;

use crate::interface::*;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Opt::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let cwd = match args.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{path}'"))?,
        None => {
            let cwd = std::env::current_dir()?;
            Utf8PathBuf::from_path_buf(cwd).map_err(minigit::Error::NonUtf8Path)?
        }
    };

    let repo = || -> Result<Repo> {
        let root =
            util::find_root(&cwd).ok_or_else(|| minigit::Error::NotARepository(cwd.clone()))?;
        Ok(Repo::open(root)?)
    };

    match &args.command {
        Command::Init => {
            let repo = Repo::init(&cwd)?;
            println!("Initialised empty repository in {}", repo.root());
        }
        Command::Add { path } => {
            let paths: Vec<Utf8PathBuf> = path.iter().map(|p| cwd.join(p)).collect();
            for added in repo()?.add(&paths)? {
                println!("add '{added}'");
            }
        }
        Command::Commit { message } => {
            let commit_id = repo()?.commit(message)?;
            println!("Created commit {}", commit_id.to_hex());
        }
        Command::Branch { name: Some(name) } => {
            repo()?.branch(name)?;
            println!("Switched to a new branch '{name}'");
        }
        Command::Branch { name: None } => print_branches(&repo()?)?,
        Command::Checkout { branch } => match repo()?.checkout(branch)? {
            Checkout::AlreadyOn(branch) => println!("Already on '{branch}'"),
            Checkout::Switched { branch, .. } => println!("Switched to branch '{branch}'"),
        },
        Command::Merge { branch } => match repo()?.merge(branch)? {
            Merge::AlreadyUpToDate => println!("Already up to date."),
            Merge::FastForward { from, to } => {
                let from = from.map(|oid| oid.short()).unwrap_or_default();
                println!("Updating {from}..{}\nFast-forward", to.short());
            }
        },
        Command::Log => print_log(&repo()?)?,
        Command::CatFile(args) => return cat_file::handle(&repo()?, args),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_branches(repo: &Repo) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for (name, current) in repo.list_branches()? {
        if current {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            writeln!(stdout, "* {name}")?;
            stdout.reset()?;
        } else {
            writeln!(stdout, "  {name}")?;
        }
    }
    Ok(())
}

fn print_log(repo: &Repo) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for (oid, commit) in repo.log()? {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(stdout, "commit {oid:x}")?;
        stdout.reset()?;
        writeln!(stdout, "Date:   {}\n", commit.timestamp().0.to_rfc2822())?;
        for line in commit.message().lines() {
            writeln!(stdout, "    {line}")?;
        }
        writeln!(stdout)?;
    }
    Ok(())
}
