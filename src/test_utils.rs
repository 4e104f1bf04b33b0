//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

/// テスト用の TS ドキュメントを作成する
///
/// # Arguments
/// * `language` - 言語コード（例: "ko", "pt_BR"）
/// * `contexts` - `<TS>` 要素の中身（`<context>` の並び）
///
/// # Returns
/// lupdate と同じヘッダーを持つ TS ドキュメントの文字列
pub(crate) fn catalog_text(language: &str, contexts: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.1\" language=\"{language}\">\n{contexts}</TS>\n"
    )
}

/// テスト用のワークスペースにカタログファイルを書き込む
///
/// # Arguments
/// * `root` - ワークスペースのルートパス
/// * `relative_path` - ルートからの相対パス（例: "nls/VirtualBox_ko.ts"）
/// * `content` - ファイルの内容
///
/// # Panics
/// ディレクトリ作成または書き込みに失敗した場合
pub(crate) fn write_catalog(root: &std::path::Path, relative_path: &str, content: &str) {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// 1 件の完了済みメッセージを持つコンテキストを作成する
pub(crate) fn single_message(context: &str, source: &str, translation: &str) -> String {
    format!(
        "<context>\n    <name>{context}</name>\n    <message>\n        <source>{source}</source>\n        <translation>{translation}</translation>\n    </message>\n</context>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn write_catalog_fails_loudly_when_parent_is_a_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("nls"), "").unwrap();

        write_catalog(temp_dir.path(), "nls/VirtualBox_ko.ts", &catalog_text("ko", ""));
    }
}
