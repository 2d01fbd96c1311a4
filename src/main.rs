use clap::Parser;
use folio_gallery::{catalog, cli, config, error, placeholder, server};
use folio_gallery_common::{
    apply_filter, photo_stream, read_deep_link, types::normalize_label, write_deep_link, ActiveFilter,
    GalleryController, ItemId, PhotoPager,
};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Categories { catalog: path, filter } => {
            let controller = controller_with_filter(&path, &filter, &config)?;
            println!("{}", cli::render_categories(&controller.category_counts()));
            println!("\n{}件表示", controller.visible_count());
        }

        Commands::Filter { catalog: path, filter, photos } => {
            let catalog = catalog::load(&path)?;
            let active: ActiveFilter = filter.iter().map(|l| normalize_label(l)).collect();
            let filtered = apply_filter(&catalog, &active);

            if photos {
                let stream = photo_stream(&filtered);
                let total = stream.len();
                let mut pager = PhotoPager::new(config.photos_page_size);
                pager.sync(active.iter(), total);

                // Web の LOAD MORE と同じ区切りで出力
                let mut printed = 0;
                loop {
                    let shown = pager.visible(total);
                    for src in &stream[printed..shown] {
                        println!("{src}");
                    }
                    printed = shown;
                    if !pager.has_more(total) {
                        break;
                    }
                    println!("-- {} --", pager.label(total));
                    pager.load_more(total);
                }
                println!("\n{}枚", total);
            } else {
                for item in &filtered {
                    println!("{}", cli::render_item(item));
                }
                println!("\n{}/{}件", filtered.len(), catalog.len());
            }
        }

        Commands::Scan { folder, output } => {
            eprintln!("📁 folio - フォルダスキャン\n");
            let catalog = catalog::scan_folder(&folder)?;
            eprintln!("✔ {}件の作品を検出", catalog.len());

            match output {
                Some(out) => {
                    catalog::save_json(&catalog, &out)?;
                    println!("✔ カタログを保存: {}", out.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&catalog)?),
            }
        }

        Commands::Link { url, set, clear, param } => {
            let param = param.unwrap_or_else(|| config.deep_link_param.clone());

            if let Some(id) = set {
                println!("{}", write_deep_link(&url, &param, Some(ItemId(id))));
            } else if clear {
                println!("{}", write_deep_link(&url, &param, None));
            } else {
                match read_deep_link(&url, &param) {
                    Some(id) => println!("{id}"),
                    None => println!("（ディープリンクなし）"),
                }
            }
        }

        Commands::Blur { images, width } => {
            let width = width.unwrap_or(config.placeholder_width);

            if images.len() == 1 {
                println!("{}", placeholder::generate_blur_data_url(&images[0], width)?);
            } else {
                let pb = ProgressBar::new(images.len() as u64);
                let style = ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .map(|s| s.progress_chars("##-"))
                    .unwrap_or_else(|_| ProgressStyle::default_bar());
                pb.set_style(style);

                let results: Vec<_> = images
                    .par_iter()
                    .map(|path| {
                        let result = placeholder::generate_blur_data_url(path, width);
                        pb.inc(1);
                        (path, result)
                    })
                    .collect();
                pb.finish_and_clear();

                let mut failed = 0;
                for (path, result) in results {
                    match result {
                        Ok(data_url) => println!("{}\t{}", path.display(), data_url),
                        Err(e) => {
                            failed += 1;
                            tracing::warn!("{}: {}", path.display(), e);
                        }
                    }
                }
                if failed > 0 {
                    eprintln!("⚠ {}件失敗", failed);
                }
            }
        }

        Commands::Serve { media_root, port } => {
            let media_root = match media_root {
                Some(root) => root,
                None => config.media_root()?,
            };
            let port = port.unwrap_or_else(|| config.port());

            let service = placeholder::PlaceholderService::new(
                &media_root,
                config.placeholder_width,
                config.placeholder_cache_limit,
            )?;
            server::serve(Arc::new(service), port).await?;
        }

        Commands::Config { show, set_media_root, set_port } => {
            let mut config = config;

            if let Some(root) = set_media_root {
                config.set_media_root(root)?;
                println!("✔ 画像ルートを設定しました");
            }

            if let Some(port) = set_port {
                config.set_port(port)?;
                println!("✔ ポートを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ディープリンク: ?{}=ID", config.deep_link_param);
                println!(
                    "  画像ルート: {}",
                    config
                        .media_root
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  ポート: {}", config.port());
                println!("  プレースホルダー幅: {}px", config.placeholder_width);
                println!("  キャッシュ上限: {}", config.placeholder_cache_limit);
                println!("  写真ページサイズ: {}", config.photos_page_size);
            }
        }
    }

    Ok(())
}

/// カテゴリを順にトグルした状態のコントローラー
///
/// 件数0のラベルは画面と同じく選択されない。
fn controller_with_filter(path: &std::path::Path, filter: &[String], config: &Config) -> Result<GalleryController> {
    let catalog = catalog::load(path)?;
    let mut controller = GalleryController::with_param(catalog, &config.deep_link_param);
    for label in filter {
        if controller.active_filter().contains(&normalize_label(label)) {
            continue;
        }
        if !controller.toggle_category(label) {
            tracing::warn!("カテゴリ {label} は選択できません（該当0件）");
        }
    }
    Ok(controller)
}
