//! フォーム操作コマンドの振り分け
//!
//! 元アドオンのボタン1つにつき `Command` 1つ。結果は必ず `Report`
//! （ユーザーに見せる短いメッセージ）として返す。

use crate::config::Credentials;
use crate::error::Error;
use crate::form::{Attribute, Creator, FileEntry, FormState};
use crate::metadata::{self, output_dir_for};
use crate::mint::{MintClient, MintTransport};
use std::fmt;
use std::path::PathBuf;

/// 操作対象のフォームと、それを取り巻く状態
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub form: FormState,
    pub credentials: Credentials,
    /// フォームファイルのパス。未保存なら None
    pub document_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddAttribute(Attribute),
    AddFile(FileEntry),
    AddCreator(Creator),
    GenerateMetadata,
    MintNft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub level: Level,
    pub message: String,
}

impl Report {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl From<Error> for Report {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::MissingCredential => {
                "Helius API key is not set. Please set HELIUS_API_KEY.".to_string()
            }
            Error::RemoteMintFailure { .. } => {
                "Failed to mint asset. Check the log for details.".to_string()
            }
            _ => err.to_string(),
        };
        Report::error(message)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Info => "✅",
            Level::Error => "❌",
        };
        write!(f, "{} {}", tag, self.message)
    }
}

pub fn dispatch<T: MintTransport>(
    session: &mut Session,
    command: Command,
    client: &MintClient<T>,
) -> Report {
    match command {
        Command::AddAttribute(attribute) => {
            session.form.add_attribute(attribute);
            Report::info(format!("attribute row added ({} total)", session.form.attributes.len()))
        }
        Command::AddFile(file) => {
            session.form.add_file(file);
            Report::info(format!("file row added ({} total)", session.form.files.len()))
        }
        Command::AddCreator(creator) => {
            session.form.add_creator(creator);
            let count = session.form.creators.len();
            if session.form.shares_balanced() {
                Report::info(format!("creator row added ({} total)", count))
            } else {
                let total = session.form.creator_share_total();
                log::warn!("creator shares sum to {}%, expected 100%", total);
                Report::info(format!(
                    "creator row added ({} total, shares {}% ≠ 100%)",
                    count, total
                ))
            }
        }
        Command::GenerateMetadata => generate(session),
        Command::MintNft => mint(session, client),
    }
}

fn generate(session: &Session) -> Report {
    let form = &session.form;
    let written = output_dir_for(session.document_path.as_deref()).and_then(|dir| {
        metadata::generate(
            &form.metadata,
            &form.attributes,
            &form.files,
            &form.output_file_name,
            &dir,
        )
    });

    match written {
        Ok(path) => Report::info(format!("Metadata written: {}", path.display())),
        Err(err) => err.into(),
    }
}

fn mint<T: MintTransport>(session: &Session, client: &MintClient<T>) -> Report {
    let form = &session.form;
    let minted = client.mint(
        &session.credentials,
        &form.metadata,
        &form.attributes,
        &form.mint.owner,
        &form.metadata.external_url,
        form.mint.seller_fee_basis_points,
    );

    match minted {
        Ok(result) => Report::info(format!("Minted asset: {}", result.asset_id)),
        Err(err) => err.into(),
    }
}
