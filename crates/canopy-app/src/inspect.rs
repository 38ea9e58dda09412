//! Headless rendering of layouts as resolved trees.

use std::fmt::Write;
use std::sync::Arc;

use canopy_client::{BoxItem, Workspace, WorkspacesApi};
use canopy_common::CanopyError;
use canopy_config::{CanopyConfig, HibernationConfig, LayoutsConfig};
use canopy_platform::{HeadlessWindows, Platform};
use canopy_protocol::{ImportMode, LockConfig, WorkspaceLayout};

/// Opens every layout on a throwaway headless platform and renders each
/// resulting workspace.
pub async fn inspect(
    config: &CanopyConfig,
    layouts: Vec<WorkspaceLayout>,
    show_locks: bool,
) -> Result<Vec<String>, CanopyError> {
    let config = CanopyConfig {
        hibernation: HibernationConfig::default(),
        layouts: LayoutsConfig::default(),
        ..config.clone()
    };
    let platform = Platform::start(&config, Arc::new(HeadlessWindows::new())).await?;
    let api = WorkspacesApi::new(platform.handle());

    let names: Vec<String> = layouts.iter().map(|layout| layout.name.clone()).collect();
    let rendered = async {
        api.layouts().import(layouts, ImportMode::Merge).await?;
        let mut out = Vec::with_capacity(names.len());
        for name in &names {
            let workspace = api.restore_workspace(name.as_str(), None).await?;
            out.push(render(&workspace, show_locks));
        }
        Ok(out)
    }
    .await;

    platform.shutdown().await;
    rendered
}

fn bounds(min: u32, max: u32) -> String {
    format!("{min}..{max}")
}

fn flags(locks: &LockConfig) -> String {
    let locked: Vec<&str> = locks
        .iter()
        .filter(|(_, allowed)| !allowed)
        .map(|(flag, _)| flag.as_str())
        .collect();
    if locked.is_empty() {
        "unlocked".to_string()
    } else {
        format!("locked: {}", locked.join(", "))
    }
}

pub fn render(workspace: &Workspace, show_locks: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "workspace \"{}\" layout={} width {} height {}",
        workspace.title(),
        workspace.layout_name().unwrap_or("-"),
        bounds(workspace.min_width(), workspace.max_width()),
        bounds(workspace.min_height(), workspace.max_height()),
    );
    if show_locks {
        let _ = writeln!(out, "  {}", flags(workspace.locks()));
    }
    for child in workspace.children() {
        render_box(&mut out, &child, 1, show_locks);
    }
    out
}

fn render_box(out: &mut String, item: &BoxItem, depth: usize, show_locks: bool) {
    let indent = "  ".repeat(depth);
    let label = match item {
        BoxItem::Window(window) => format!("window {}", window.app_name()),
        other => other.box_type().to_string(),
    };
    let _ = writeln!(
        out,
        "{indent}{label} width {} height {}{}",
        bounds(item.min_width(), item.max_width()),
        bounds(item.min_height(), item.max_height()),
        if item.is_maximized() { " maximized" } else { "" },
    );
    if show_locks {
        let _ = writeln!(out, "{indent}  {}", flags(item.locks()));
    }
    for child in item.children() {
        render_box(out, &child, depth + 1, show_locks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{check, tests::daily};

    #[tokio::test]
    async fn renders_resolved_constraints() {
        let layouts = check(vec![daily()])
            .into_iter()
            .map(|checked| checked.result.unwrap())
            .collect();
        let rendered = inspect(&CanopyConfig::default(), layouts, false)
            .await
            .unwrap();
        assert_eq!(rendered.len(), 1);

        let lines: Vec<&str> = rendered[0].lines().collect();
        assert!(lines[0].starts_with("workspace \"Daily\" layout=daily"));
        assert!(lines[1].trim_start().starts_with("row"));
        assert!(lines[2].trim_start().starts_with("window notes"));
        assert!(lines[3].trim_start().starts_with("column width 500..1000"));
        assert_eq!(lines.len(), 6);
    }

    #[tokio::test]
    async fn lock_flags_are_listed_when_asked() {
        let layouts = check(vec![daily()])
            .into_iter()
            .map(|checked| checked.result.unwrap())
            .collect();
        let rendered = inspect(&CanopyConfig::default(), layouts, true)
            .await
            .unwrap();
        assert!(rendered[0].contains("unlocked"));
    }
}
