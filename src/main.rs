use sol_nft_metadata::command::{Command, Session, dispatch};
use sol_nft_metadata::config::AppConfig;
use sol_nft_metadata::form::{Attribute, Creator, FileEntry, FormState};
use sol_nft_metadata::mint::{HttpTransport, MintClient};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NFT メタデータの生成と Helius でのミント
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// フォームファイル（YAML）
    #[arg(short, long, default_value = "form.yaml")]
    form: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 属性行を追加する（値を省略すると空行）
    AddAttribute {
        #[arg(long, default_value = "")]
        trait_type: String,
        #[arg(long, default_value = "")]
        value: String,
    },
    /// ファイル行を追加する
    AddFile {
        #[arg(long, default_value = "")]
        uri: String,
        #[arg(long = "type", default_value = "")]
        file_type: String,
        #[arg(long)]
        cdn: bool,
    },
    /// クリエイター行を追加する
    AddCreator {
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value_t = 0.0)]
        share: f32,
    },
    /// `<output_file_name>.json` をフォームと同じディレクトリに書き出す
    Generate,
    /// Helius に mintCompressedNft を送る
    Mint,
}

impl Commands {
    fn edits_form(&self) -> bool {
        matches!(
            self,
            Commands::AddAttribute { .. } | Commands::AddFile { .. } | Commands::AddCreator { .. }
        )
    }

    fn into_command(self) -> Command {
        match self {
            Commands::AddAttribute { trait_type, value } => {
                Command::AddAttribute(Attribute::new(trait_type, value))
            }
            Commands::AddFile { uri, file_type, cdn } => {
                Command::AddFile(FileEntry::new(uri, file_type, cdn))
            }
            Commands::AddCreator { address, share } => {
                Command::AddCreator(Creator { address, share })
            }
            Commands::Generate => Command::GenerateMetadata,
            Commands::Mint => Command::MintNft,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let edits_form = cli.command.edits_form();

    let form = if cli.form.exists() {
        FormState::load(&cli.form)?
    } else if edits_form {
        log::info!("{:?} が無いので空のフォームから始めます", cli.form);
        FormState::default()
    } else {
        bail!("フォームファイルが見つかりません: {:?}", cli.form);
    };

    let mut session = Session {
        form,
        credentials: config.credentials,
        document_path: Some(cli.form.clone()),
    };

    let transport = HttpTransport::new().context("HTTP クライアントの初期化に失敗しました")?;
    let client = MintClient::new(transport, config.rpc_url);

    let report = dispatch(&mut session, cli.command.into_command(), &client);
    println!("{}", report);

    if report.is_error() {
        std::process::exit(1);
    }

    if edits_form {
        session.form.save(&cli.form)?;
    }

    Ok(())
}
