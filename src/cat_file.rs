use std::io::Write;
use std::process::ExitCode;

use color_eyre::eyre::Context;
use minigit::database::LoadedItem;
use minigit::repo::Repo;

use crate::interface::CatFile;

pub fn handle(repo: &Repo, args: &CatFile) -> color_eyre::Result<ExitCode> {
    match args {
        CatFile::Exists { object } => {
            if !repo.database.exists(object) {
                eprintln!("Object does not exist: {object:x}");
                return Ok(ExitCode::FAILURE);
            }
            if let Err(e) = repo.cat_file(object) {
                eprintln!("Object is corrupt: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
        CatFile::PrettyPrint { object } => match repo.cat_file(object)? {
            LoadedItem::Blob(data) => std::io::stdout()
                .write_all(&data)
                .wrap_err("Failed to write blob to stdout")?,
            LoadedItem::Commit(commit) => print!("{}", commit.pretty()),
            LoadedItem::Tree(tree) => print!("{}", tree.pretty()),
        },
        CatFile::Type { object } => {
            let (kind, _) = repo.database.read_object(object)?;
            println!("{kind}");
        }
        CatFile::Size { object } => {
            let (_, data) = repo.database.read_object(object)?;
            println!("{}", data.len());
        }
    }
    Ok(ExitCode::SUCCESS)
}
