//! Headless tgui demo
//!
//! Mounts the app shell, follows a simulated system theme, opens a modal
//! through the portal and presses a tappable.
//!
//! Run with:
//! `cargo run -p tgui_app --example headless_demo`

use std::rc::Rc;
use std::time::Duration;

use tgui_app::prelude::*;
use tgui_theme::headless::{HeadlessHostBridge, HeadlessMediaQuery};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = AppRootConfig::from_toml_str(
        r#"
        platform = "base"
        follow_system = true
        ripple_duration_ms = 300
        "#,
    )?;

    let host = Rc::new(HeadlessHostBridge::new(None));
    let system = Rc::new(HeadlessMediaQuery::new(false));
    let env = ThemeEnvironment::unavailable()
        .with_host(host)
        .with_system(system.clone());
    let app = AppRoot::mount(UiContext::new(config, env))?;
    let ctx = app.context();

    system.set_prefers_dark(true);
    tracing::info!("appearance after system change: {}", ctx.theme().appearance());

    let outlet = PortalOutlet::new(ctx.widgets());
    outlet.project(from_fn(|doc| {
        let modal = doc.create_element("div");
        doc.add_class(modal, "modal")?;
        Ok(vec![modal])
    }));

    let tappable = ctx.tappable();
    tappable.set_rect(Rect::new(0.0, 0.0, 120.0, 40.0));
    tappable.handle_event(&PointerEvent::down(1, 24.0, 12.0));
    tracing::info!("waves while pressed: {:?}", tappable.waves());

    ctx.scheduler().advance_by(Duration::from_millis(ctx.config().ripple_duration_ms));
    tracing::info!("waves after expiry: {}", tappable.waves().len());

    if let Some(root) = app.root() {
        println!("{}", ctx.document().outer_html(root));
    }
    Ok(())
}
