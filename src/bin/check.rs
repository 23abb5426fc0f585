use anyhow::{Context, Result};
use sol_nft_metadata::config::AppConfig;
use sol_nft_metadata::form::FormState;
use sol_nft_metadata::metadata::{MetadataDocument, output_dir_for, output_path};
use sol_nft_metadata::mint::MintRequest;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let form_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("form.yaml"));

    let form = FormState::load(&form_path)?;
    let config = AppConfig::from_env();

    let skipped_attributes = form.attributes.iter().filter(|a| !a.is_complete()).count();
    let skipped_files = form.files.iter().filter(|f| !f.is_complete()).count();

    let document = MetadataDocument::from_form(&form);
    let preview = document.to_json().context("メタデータのJSONシリアライズに失敗しました")?;

    println!("==============================");
    println!(" NFT Metadata Check");
    println!(" Form: {}", form_path.display());
    println!("==============================\n");

    println!("▶ Metadata preview");
    println!("{}\n", preview);

    if skipped_attributes > 0 {
        println!("⚠ 未入力の属性行 {} 件は出力されません", skipped_attributes);
    }
    if skipped_files > 0 {
        println!("⚠ 未入力のファイル行 {} 件は出力されません", skipped_files);
    }

    let request = MintRequest::from_form(&form);
    println!("\n▶ Mint payload");
    println!("{}\n", serde_json::to_string_pretty(&request)?);

    if form.creators.is_empty() {
        println!("(クリエイター未登録)");
    } else if form.shares_balanced() {
        println!("✅ クリエイターシェア合計: {}%", form.creator_share_total());
    } else {
        println!(
            "⚠ クリエイターシェア合計が 100% ではありません: {}%",
            form.creator_share_total()
        );
    }

    if config.credentials.is_empty() {
        println!("⚠ HELIUS_API_KEY が未設定のため mint はできません");
    } else {
        println!("✅ HELIUS_API_KEY 設定済み");
    }

    let output_dir = output_dir_for(Some(form_path.as_path()))?;
    let existing = output_path(&form.output_file_name, &output_dir);
    if !existing.exists() {
        println!("(生成済みファイル {:?} はまだありません)", existing);
        return Ok(());
    }

    let text = fs::read_to_string(&existing)
        .with_context(|| format!("JSON 読み込み失敗: {:?}", existing))?;
    let on_disk: MetadataDocument = serde_json::from_str(&text)
        .with_context(|| format!("JSON パース失敗: {:?}", existing))?;

    if on_disk == document {
        println!("✅ {:?} はフォームと一致しています", existing);
    } else {
        println!("❌ {:?} はフォームと一致しません。generate し直してください", existing);
        std::process::exit(1);
    }

    Ok(())
}
