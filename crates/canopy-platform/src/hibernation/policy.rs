use canopy_common::WorkspaceId;
use canopy_protocol::WorkspaceSummary;

/// Workspaces to hibernate so that at most `threshold` stay active.
///
/// Only non-hibernated workspaces holding at least one window count. The
/// excess is taken from the least recently active, and a selected
/// workspace is never picked even when it is the oldest.
pub fn excess_workspaces(summaries: &[WorkspaceSummary], threshold: usize) -> Vec<WorkspaceId> {
    let active: Vec<&WorkspaceSummary> = summaries
        .iter()
        .filter(|s| !s.config.is_hibernated && s.config.window_count > 0)
        .collect();
    let excess = active.len().saturating_sub(threshold);
    if excess == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<&WorkspaceSummary> =
        active.into_iter().filter(|s| !s.config.is_selected).collect();
    candidates.sort_by_key(|s| s.config.last_active);
    candidates
        .into_iter()
        .take(excess)
        .map(|s| s.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_common::FrameId;
    use canopy_protocol::{LockConfig, WorkspaceSummaryConfig};

    fn summary(id: &str, last_active: i64, windows: usize) -> WorkspaceSummary {
        WorkspaceSummary {
            id: WorkspaceId::from(id),
            config: WorkspaceSummaryConfig {
                frame_id: FrameId::from("f-1"),
                title: id.to_string(),
                position_index: 0,
                layout_name: None,
                is_selected: false,
                is_hibernated: false,
                last_active,
                window_count: windows,
                min_width: 0,
                max_width: 32767,
                min_height: 0,
                max_height: 32767,
                locks: LockConfig::new(),
            },
        }
    }

    fn ids(list: Vec<WorkspaceId>) -> Vec<String> {
        list.into_iter().map(|id| id.as_str().to_string()).collect()
    }

    #[test]
    fn two_oldest_of_three_are_hibernated_at_threshold_one() {
        let summaries = vec![summary("b", 200, 1), summary("a", 100, 2), summary("c", 300, 1)];
        assert_eq!(ids(excess_workspaces(&summaries, 1)), vec!["a", "b"]);
    }

    #[test]
    fn selected_workspace_is_never_picked() {
        let mut oldest = summary("a", 100, 1);
        oldest.config.is_selected = true;
        let summaries = vec![oldest, summary("b", 200, 1), summary("c", 300, 1)];
        assert_eq!(ids(excess_workspaces(&summaries, 1)), vec!["b", "c"]);
    }

    #[test]
    fn empty_and_hibernated_workspaces_do_not_count() {
        let mut sleeping = summary("a", 100, 3);
        sleeping.config.is_hibernated = true;
        let summaries = vec![sleeping, summary("b", 200, 0), summary("c", 300, 1)];
        assert!(excess_workspaces(&summaries, 1).is_empty());
    }

    #[test]
    fn under_threshold_is_left_alone() {
        let summaries = vec![summary("a", 100, 1), summary("b", 200, 1)];
        assert!(excess_workspaces(&summaries, 2).is_empty());
    }
}
