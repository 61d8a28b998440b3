//! GbrView 演示程序
//!
//! 用法：`gbrview [scene.json]`，不带参数时运行内置演示场景。

mod scene;

use anyhow::Result;
use gbrview_core::prelude::*;
use scene::Scene;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn run_queries(scene: &Scene, store: &LayeredItemStore) {
    let service = LocateService::from_config(&scene.config);
    let no_apertures = ApertureTable::new();

    for query in &scene.queries {
        match service.locate(store, query) {
            Some(hit) => {
                let resolver = store.apertures(hit.layer).unwrap_or(&no_apertures);
                let items = msg_panel_info(hit.primitive, store, resolver);
                let summary: Vec<String> = items
                    .iter()
                    .map(|item| format!("{}: {}", item.label, item.value))
                    .collect();
                println!(
                    "({}, {}) -> layer {} item {} [{}]",
                    query.point.x,
                    query.point.y,
                    hit.layer,
                    hit.index,
                    summary.join(", ")
                );
            }
            None => println!("({}, {}) -> nothing", query.point.x, query.point.y),
        }
    }
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish()
    )?;

    let scene = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading scene {}", path.display());
            Scene::load(&path)?
        }
        None => {
            info!("No scene given, using demo scene");
            Scene::demo()
        }
    };

    let store = scene.build_store()?;
    run_queries(&scene, &store);

    Ok(())
}
