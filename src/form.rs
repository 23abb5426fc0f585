use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// フォーム全体（元アドオンでシーンにぶら下がっていた入力値一式）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub metadata: MetadataRecord,
    pub attributes: Vec<Attribute>,
    pub files: Vec<FileEntry>,
    pub creators: Vec<Creator>,
    pub output_file_name: String,
    pub mint: MintFields,
}

impl FormState {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("フォームファイルの読み込みに失敗しました: {:?}", path))?;
        let form: FormState = serde_yaml::from_str(&text)
            .with_context(|| format!("フォームファイルのパースに失敗しました: {:?}", path))?;
        Ok(form)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_yaml::to_string(self).context("フォームのYAMLシリアライズに失敗しました")?;
        fs::write(path, text)
            .with_context(|| format!("フォームファイルの書き込みに失敗しました: {:?}", path))?;
        Ok(())
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn add_file(&mut self, file: FileEntry) {
        self.files.push(file);
    }

    pub fn add_creator(&mut self, creator: Creator) {
        self.creators.push(creator);
    }

    /// クリエイターのシェア合計（%）
    pub fn creator_share_total(&self) -> f32 {
        self.creators.iter().map(|c| c.share).sum()
    }

    /// シェア合計が 100% かどうか（±0.05 まで許容）。クリエイター未登録なら true 扱い
    pub fn shares_balanced(&self) -> bool {
        const TOLERANCE: f32 = 0.05;
        self.creators.is_empty() || (self.creator_share_total() - 100.0).abs() <= TOLERANCE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub animation_url: String,
    pub external_url: String,
    pub category: String,
}

/// ミント用の入力欄。delegate / collection は現状ペイロードに載らない
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MintFields {
    pub owner: String,
    pub delegate: String,
    pub collection: String,
    pub seller_fee_basis_points: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.trait_type.is_empty() && !self.value.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEntry {
    pub uri: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub cdn: bool,
}

impl FileEntry {
    pub fn new(uri: impl Into<String>, file_type: impl Into<String>, cdn: bool) -> Self {
        Self {
            uri: uri.into(),
            file_type: file_type.into(),
            cdn,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.uri.is_empty() && !self.file_type.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Creator {
    pub address: String,
    pub share: f32,
}

/// trait_type と value が両方埋まっている行だけを残す
pub fn complete_attributes(attributes: &[Attribute]) -> Vec<Attribute> {
    attributes.iter().filter(|a| a.is_complete()).cloned().collect()
}

/// uri と type が両方埋まっているファイルだけを残す
pub fn complete_files(files: &[FileEntry]) -> Vec<FileEntry> {
    files.iter().filter(|f| f.is_complete()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn incomplete_rows_are_filtered() {
        let attributes = vec![
            Attribute::new("fur", "orange"),
            Attribute::new("", "blue"),
            Attribute::new("eyes", ""),
            Attribute::default(),
        ];
        assert_eq!(complete_attributes(&attributes), vec![Attribute::new("fur", "orange")]);

        let files = vec![
            FileEntry::new("ipfs://a", "image/png", true),
            FileEntry::new("ipfs://b", "", false),
            FileEntry::new("", "video/mp4", false),
        ];
        assert_eq!(complete_files(&files), vec![FileEntry::new("ipfs://a", "image/png", true)]);
    }

    #[test]
    fn share_total_and_balance() {
        let mut form = FormState::default();
        assert!(form.shares_balanced());

        form.add_creator(Creator { address: "A".into(), share: 60.0 });
        assert!(!form.shares_balanced());

        form.add_creator(Creator { address: "B".into(), share: 40.0 });
        assert_eq!(form.creator_share_total(), 100.0);
        assert!(form.shares_balanced());
    }

    #[test]
    fn thirds_rounded_to_two_decimals_are_balanced() {
        let mut form = FormState::default();
        for address in ["A", "B", "C"] {
            form.add_creator(Creator { address: address.into(), share: 33.33 });
        }
        assert!(form.shares_balanced());

        form.creators[2].share = 33.0;
        assert!(!form.shares_balanced());
    }

    #[test]
    fn load_partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("form.yaml");
        fs::write(
            &path,
            "metadata:\n  name: \"Cat #1\"\n  symbol: CAT\nfiles:\n  - uri: ipfs://abc\n    type: image/png\n",
        )
        .unwrap();

        let form = FormState::load(&path).unwrap();
        assert_eq!(form.metadata.name, "Cat #1");
        assert_eq!(form.metadata.description, "");
        assert_eq!(form.files, vec![FileEntry::new("ipfs://abc", "image/png", false)]);
        assert_eq!(form.mint.seller_fee_basis_points, 0);
    }

    #[test]
    fn save_then_load_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("form.yaml");

        let mut form = FormState::default();
        form.metadata.name = "Orange Cat".into();
        form.add_attribute(Attribute::default());
        form.add_file(FileEntry::new("ipfs://abc", "image/png", true));
        form.save(&path).unwrap();

        assert_eq!(FormState::load(&path).unwrap(), form);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(FormState::load(dir.path().join("nope.yaml")).is_err());
    }
}
