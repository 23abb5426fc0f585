use crate::error::{Error, Result};
use crate::form::{Attribute, FileEntry, FormState, MetadataRecord, complete_attributes, complete_files};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 書き出すメタデータ JSON
///
/// フィールド順がそのまま出力のキー順になる。空の値はキーごと省く。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub symbol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub animation_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub files: Vec<FileEntry>,
    /// トップレベルの category と同じ値が入る
    pub category: String,
}

impl MetadataDocument {
    pub fn build(record: &MetadataRecord, attributes: &[Attribute], files: &[FileEntry]) -> Self {
        let files = complete_files(files);
        let properties = if files.is_empty() {
            None
        } else {
            Some(Properties {
                files,
                category: record.category.clone(),
            })
        };

        MetadataDocument {
            name: record.name.clone(),
            symbol: record.symbol.clone(),
            description: record.description.clone(),
            image: record.image.clone(),
            animation_url: record.animation_url.clone(),
            external_url: record.external_url.clone(),
            category: record.category.clone(),
            attributes: complete_attributes(attributes),
            properties,
        }
    }

    pub fn from_form(form: &FormState) -> Self {
        Self::build(&form.metadata, &form.attributes, &form.files)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `<output_dir>/<output_name>.json` にメタデータを書き出す（既存ファイルは上書き）
pub fn generate(
    record: &MetadataRecord,
    attributes: &[Attribute],
    files: &[FileEntry],
    output_name: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let document = MetadataDocument::build(record, attributes, files);
    let json = document.to_json()?;

    let path = output_path(output_name, output_dir);
    fs::write(&path, json).map_err(|source| Error::Filesystem {
        path: path.clone(),
        source,
    })?;

    log::debug!("metadata written to {:?}", path);
    Ok(path)
}

pub fn output_path(output_name: &str, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.json", output_name))
}

/// フォームファイルと同じディレクトリを出力先にする
pub fn output_dir_for(document_path: Option<&Path>) -> Result<PathBuf> {
    let path = document_path.ok_or(Error::MissingDocumentPath)?;
    match path.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(Error::MissingDocumentPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cat_record() -> MetadataRecord {
        MetadataRecord {
            name: "Cat #1".into(),
            symbol: "CAT".into(),
            image: "ipfs://abc".into(),
            category: "image".into(),
            ..Default::default()
        }
    }

    #[test]
    fn cat_scenario_matches_expected_document() {
        let doc = MetadataDocument::build(&cat_record(), &[Attribute::new("fur", "orange")], &[]);
        let compact = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            compact,
            r#"{"name":"Cat #1","symbol":"CAT","image":"ipfs://abc","category":"image","attributes":[{"trait_type":"fur","value":"orange"}]}"#
        );
    }

    #[test]
    fn top_level_keys_keep_fixed_order() {
        let record = MetadataRecord {
            name: "n".into(),
            symbol: "s".into(),
            description: "d".into(),
            image: "i".into(),
            animation_url: "a".into(),
            external_url: "e".into(),
            category: "c".into(),
        };
        let doc = MetadataDocument::build(&record, &[], &[]);
        let json = doc.to_json().unwrap();
        let positions: Vec<usize> =
            ["name", "symbol", "description", "image", "animation_url", "external_url", "category"]
                .iter()
                .map(|k| json.find(&format!("\"{}\"", k)).unwrap())
                .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn empty_lists_omit_keys() {
        let doc = MetadataDocument::build(
            &cat_record(),
            &[Attribute::new("", "orange")],
            &[FileEntry::new("ipfs://x", "", true)],
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("attributes").is_none());
        assert!(value.get("properties").is_none());
    }

    #[test]
    fn properties_duplicate_category() {
        let doc = MetadataDocument::build(
            &cat_record(),
            &[],
            &[
                FileEntry::new("ipfs://abc", "image/png", true),
                FileEntry::new("", "image/png", false),
            ],
        );
        assert_eq!(
            serde_json::to_value(&doc).unwrap()["properties"],
            json!({
                "files": [{"uri": "ipfs://abc", "type": "image/png", "cdn": true}],
                "category": "image"
            })
        );
    }

    #[test]
    fn generate_writes_and_overwrites() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cat.json"), "stale").unwrap();

        let path = generate(&cat_record(), &[], &[], "cat", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("cat.json"));

        let written: MetadataDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, MetadataDocument::build(&cat_record(), &[], &[]));
    }

    #[test]
    fn generate_into_missing_dir_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no/such/dir");
        let err = generate(&cat_record(), &[], &[], "cat", &missing).unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[test]
    fn output_dir_follows_document() {
        assert!(matches!(output_dir_for(None), Err(Error::MissingDocumentPath)));
        assert_eq!(
            output_dir_for(Some(Path::new("/work/cat/form.yaml"))).unwrap(),
            PathBuf::from("/work/cat")
        );
        assert_eq!(output_dir_for(Some(Path::new("form.yaml"))).unwrap(), PathBuf::from("."));
    }
}
