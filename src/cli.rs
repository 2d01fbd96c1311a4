use clap::{Parser, Subcommand};
use folio_gallery_common::{CategoryCount, Item};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "写真ポートフォリオ・ギャラリーの運用ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カテゴリ一覧（件数付き）を表示
    Categories {
        /// カタログ（JSONファイルまたはフォルダ）
        #[arg(required = true)]
        catalog: PathBuf,

        /// 選択中のカテゴリ（複数指定でAND）
        #[arg(short = 'f', long = "filter")]
        filter: Vec<String>,
    },

    /// フィルタに一致する作品を表示
    Filter {
        /// カタログ（JSONファイルまたはフォルダ）
        #[arg(required = true)]
        catalog: PathBuf,

        /// 選択中のカテゴリ（複数指定でAND）
        #[arg(short = 'f', long = "filter")]
        filter: Vec<String>,

        /// 作品ではなく写真を一覧表示
        #[arg(long)]
        photos: bool,
    },

    /// フォルダツリーからカタログJSONを生成
    Scan {
        /// メディアフォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// ディープリンクの読み取り/書き換え
    Link {
        /// 対象URL
        #[arg(required = true)]
        url: String,

        /// 作品IDを設定
        #[arg(long, conflicts_with = "clear")]
        set: Option<i64>,

        /// パラメータを削除
        #[arg(long)]
        clear: bool,

        /// クエリパラメータ名（省略時は設定値）
        #[arg(long)]
        param: Option<String>,
    },

    /// ぼかしプレースホルダーを生成
    Blur {
        /// 画像ファイル
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// 幅(px)（省略時は設定値）
        #[arg(short, long)]
        width: Option<u32>,
    },

    /// プレースホルダーサーバーを起動
    Serve {
        /// 画像ルート（省略時は設定値）
        #[arg(long)]
        media_root: Option<PathBuf>,

        /// 待受ポート（省略時は設定値）
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 画像ルートを設定
        #[arg(long)]
        set_media_root: Option<PathBuf>,

        /// 待受ポートを設定
        #[arg(long)]
        set_port: Option<u16>,
    },
}

/// カテゴリチップの表示: `LABEL [count]`、選択中は `*`、選択不可は `-`
pub fn render_categories(counts: &[CategoryCount]) -> String {
    counts
        .iter()
        .map(|c| {
            let mark = if c.selected {
                '*'
            } else if !c.is_selectable() {
                '-'
            } else {
                ' '
            };
            format!("{} {} [{}]", mark, c.label, c.count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 作品一覧の1行表示
pub fn render_item(item: &Item) -> String {
    let images = item.images().iter().filter(|s| !s.is_empty()).count();
    format!(
        "{:>5}  {} ({})  [{}]  {}枚",
        item.id.0,
        item.title,
        item.year,
        item.categories.join(", "),
        images
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_gallery_common::ItemId;

    #[test]
    fn test_render_categories_marks() {
        let counts = vec![
            CategoryCount { label: "BW".into(), count: 2, selected: true },
            CategoryCount { label: "COLOUR".into(), count: 1, selected: false },
            CategoryCount { label: "PORTRAIT".into(), count: 0, selected: false },
        ];
        let text = render_categories(&counts);
        assert_eq!(text, "* BW [2]\n  COLOUR [1]\n- PORTRAIT [0]");
    }

    #[test]
    fn test_render_item_counts_real_images() {
        let item = Item {
            id: ItemId(7),
            title: "HARBOUR".into(),
            year: "2021".into(),
            categories: vec!["BW".into()],
            image_url: String::new(),
            gallery_images: vec!["a.jpg".into()],
            ..Default::default()
        };
        assert_eq!(render_item(&item), "    7  HARBOUR (2021)  [BW]  1枚");
    }

    #[test]
    fn test_cli_parses_repeated_filter() {
        let cli = Cli::try_parse_from(["folio", "filter", "catalog.json", "-f", "bw", "-f", "landscape", "--photos"])
            .expect("引数解析失敗");
        match cli.command {
            Commands::Filter { filter, photos, .. } => {
                assert_eq!(filter, vec!["bw", "landscape"]);
                assert!(photos);
            }
            _ => panic!("Filter コマンドではない"),
        }
    }

    #[test]
    fn test_cli_link_set_conflicts_with_clear() {
        let result = Cli::try_parse_from(["folio", "link", "https://x/?project=1", "--set", "2", "--clear"]);
        assert!(result.is_err());
    }
}
