//! Flat tab collection reducer.
//!
//! The collection holds every tab of every window in one list. Tabs of the
//! same window are adjacent and their `index` fields count 0, 1, 2, … in
//! list order. Host events carry per-window positions, so every structural
//! change translates those positions to flat offsets, applies the change and
//! then reindexes the whole list.

use std::collections::{HashMap, HashSet};

use crate::action::TablinerAction;
use crate::error::{ReduceError, ReduceResult};
use crate::model::{AttachInfo, DetachInfo, MoveInfo, Tab, TabId, WindowId};

/// The tab collection plus the tabs parked between a detach and an attach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabCollection {
    /// `None` until the first bulk load.
    pub chrome_tabs: Option<Vec<Tab>>,
    pub detached_tabs: Vec<Tab>,
}

/// Renumbers each window's tabs 0..n-1 in list order.
pub fn reindex_tabs(mut tabs: Vec<Tab>) -> Vec<Tab> {
    let mut next_index: HashMap<WindowId, usize> = HashMap::new();
    for tab in &mut tabs {
        let counter = next_index.entry(tab.window_id).or_insert(0);
        tab.index = *counter;
        *counter += 1;
    }
    tabs
}

/// Inserts `new_tab` at the flat offset that matches its `(window_id, index)`.
///
/// The tab goes right after its same-window predecessor (`index - 1`). With
/// no predecessor it goes in front of the window's first tab, and a window
/// that has no tabs yet is appended at the end, which is only valid for
/// index 0.
pub fn insert_tab(mut tabs: Vec<Tab>, new_tab: Tab) -> ReduceResult<Vec<Tab>> {
    let window_id = new_tab.window_id;
    let index = new_tab.index;

    let after_predecessor = index.checked_sub(1).and_then(|predecessor| {
        tabs.iter()
            .position(|tab| tab.window_id == window_id && tab.index == predecessor)
            .map(|offset| offset + 1)
    });
    let insert_at = after_predecessor.or_else(|| {
        tabs.iter()
            .position(|tab| tab.window_id == window_id && tab.index == 0)
    });

    match insert_at {
        Some(offset) => tabs.insert(offset, new_tab),
        None if index == 0 => tabs.push(new_tab),
        None => return Err(ReduceError::NonZeroIndexInEmptyWindow { window_id, index }),
    }
    Ok(tabs)
}

fn move_tab(tabs: &[Tab], tab_id: TabId, move_info: &MoveInfo) -> ReduceResult<Vec<Tab>> {
    let MoveInfo {
        window_id,
        from_index,
        to_index,
    } = *move_info;

    let from_offset = tabs
        .iter()
        .position(|tab| tab.window_id == window_id && tab.index == from_index)
        .filter(|&offset| tabs[offset].has_id(tab_id))
        .ok_or(ReduceError::MovedTabNotFound {
            tab_id,
            window_id,
            from_index,
        })?;

    let mut new_tabs = tabs.to_vec();
    let moved = new_tabs.remove(from_offset);

    // Positions are resolved against the list without the moved tab.
    let window_start = new_tabs
        .iter()
        .position(|tab| tab.window_id == window_id)
        .unwrap_or(from_offset);
    let window_len = new_tabs
        .iter()
        .filter(|tab| tab.window_id == window_id)
        .count();
    if to_index > window_len {
        return Err(ReduceError::MoveTargetOutOfRange {
            tab_id,
            window_id,
            to_index,
        });
    }

    new_tabs.insert(window_start + to_index, moved);
    Ok(new_tabs)
}

/// Replaces the tab with `tab`'s id, keeping the stored position.
///
/// A window change only arrives through detach and attach.
fn update_tab(tabs: &[Tab], tab: &Tab) -> ReduceResult<Vec<Tab>> {
    let Some(tab_id) = tab.id else {
        return Ok(tabs.to_vec());
    };
    let stored = tabs.iter().find(|old| old.has_id(tab_id));
    if let Some(old) = stored.filter(|old| old.window_id != tab.window_id) {
        return Err(ReduceError::UpdateWindowMismatch {
            tab_id,
            reported: tab.window_id,
            actual: old.window_id,
        });
    }

    Ok(tabs
        .iter()
        .map(|old| {
            if old.has_id(tab_id) {
                Tab {
                    index: old.index,
                    ..tab.clone()
                }
            } else {
                old.clone()
            }
        })
        .collect())
}

fn activate_tab(tabs: &[Tab], tab_id: TabId, window_id: WindowId) -> Vec<Tab> {
    tabs.iter()
        .map(|tab| {
            if tab.has_id(tab_id) {
                Tab {
                    active: true,
                    ..tab.clone()
                }
            } else if tab.window_id == window_id {
                Tab {
                    active: false,
                    ..tab.clone()
                }
            } else {
                tab.clone()
            }
        })
        .collect()
}

fn detach_tab(
    tabs: &[Tab],
    detached_tabs: &mut Vec<Tab>,
    tab_id: TabId,
    detach_info: &DetachInfo,
) -> ReduceResult<Vec<Tab>> {
    let detached = tabs
        .iter()
        .find(|tab| tab.has_id(tab_id))
        .ok_or(ReduceError::DetachedTabNotFound(tab_id))?;

    if detached.window_id != detach_info.old_window_id {
        return Err(ReduceError::DetachWindowMismatch {
            tab_id,
            reported: detach_info.old_window_id,
            actual: detached.window_id,
        });
    }
    if detached.index != detach_info.old_position {
        return Err(ReduceError::DetachPositionMismatch {
            tab_id,
            reported: detach_info.old_position,
            actual: detached.index,
        });
    }

    detached_tabs.push(detached.clone());
    Ok(tabs.iter().filter(|tab| !tab.has_id(tab_id)).cloned().collect())
}

fn attach_tab(
    tabs: &[Tab],
    detached_tabs: &mut Vec<Tab>,
    tab_id: TabId,
    attach_info: &AttachInfo,
) -> ReduceResult<Vec<Tab>> {
    let slot = detached_tabs
        .iter()
        .position(|tab| tab.has_id(tab_id))
        .ok_or(ReduceError::AttachedTabNotDetached(tab_id))?;

    let mut attached = detached_tabs.remove(slot);
    attached.window_id = attach_info.new_window_id;
    attached.index = attach_info.new_position;
    insert_tab(tabs.to_vec(), attached)
}

/// Applies a lifecycle action to the tab collection.
///
/// A bulk load replaces the list as delivered and drops any tabs still
/// waiting for an attach. Before the first bulk load
/// every other action leaves the collection untouched. Otherwise the result
/// is always reindexed. On error nothing is modified.
pub fn reduce_tabs(
    chrome_tabs: Option<&[Tab]>,
    detached_tabs: &[Tab],
    action: &TablinerAction,
) -> ReduceResult<TabCollection> {
    if let TablinerAction::BulkLoadTabs { tabs } = action {
        return Ok(TabCollection {
            chrome_tabs: Some(tabs.clone()),
            detached_tabs: Vec::new(),
        });
    }

    let Some(chrome_tabs) = chrome_tabs else {
        return Ok(TabCollection {
            chrome_tabs: None,
            detached_tabs: detached_tabs.to_vec(),
        });
    };

    let mut detached_tabs = detached_tabs.to_vec();
    let new_tabs = match action {
        TablinerAction::TabRemoved { tab_id } => chrome_tabs
            .iter()
            .filter(|tab| !tab.has_id(*tab_id))
            .cloned()
            .collect(),
        TablinerAction::TabMoved { tab_id, move_info } => {
            move_tab(chrome_tabs, *tab_id, move_info)?
        }
        TablinerAction::TabCreated { tab } => insert_tab(chrome_tabs.to_vec(), tab.clone())?,
        TablinerAction::TabUpdated { tab } => update_tab(chrome_tabs, tab)?,
        TablinerAction::TabActivated { tab_id, window_id } => {
            activate_tab(chrome_tabs, *tab_id, *window_id)
        }
        TablinerAction::TabDetached {
            tab_id,
            detach_info,
        } => detach_tab(chrome_tabs, &mut detached_tabs, *tab_id, detach_info)?,
        TablinerAction::TabAttached {
            tab_id,
            attach_info,
        } => attach_tab(chrome_tabs, &mut detached_tabs, *tab_id, attach_info)?,
        _ => chrome_tabs.to_vec(),
    };

    Ok(TabCollection {
        chrome_tabs: Some(reindex_tabs(new_tabs)),
        detached_tabs,
    })
}

/// Checks both ordering invariants of a tab list.
///
/// Each window's first tab has index 0, later tabs of the same window count
/// up by one, and a window's tabs never resume after another window's tabs.
pub fn verify_tab_order(tabs: &[Tab]) -> ReduceResult<()> {
    let out_of_order = |position: usize, reason: &str| ReduceError::TabsOutOfOrder {
        position,
        reason: reason.to_string(),
    };

    let mut finished_windows: HashSet<WindowId> = HashSet::new();
    let mut previous: Option<&Tab> = None;

    for (position, tab) in tabs.iter().enumerate() {
        match previous {
            Some(prev) if prev.window_id == tab.window_id => {
                if prev.index + 1 != tab.index {
                    return Err(out_of_order(
                        position,
                        "expected tabs in the same window to be contiguous",
                    ));
                }
            }
            _ => {
                if let Some(prev) = previous {
                    finished_windows.insert(prev.window_id);
                }
                if finished_windows.contains(&tab.window_id) {
                    return Err(out_of_order(
                        position,
                        "expected the tabs of a window to be adjacent",
                    ));
                }
                if tab.index != 0 {
                    return Err(out_of_order(
                        position,
                        "expected the first tab in a window to have index 0",
                    ));
                }
            }
        }
        previous = Some(tab);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{chrome_tabs, two_windows_two_tabs_each};

    fn ids(tabs: &[Tab]) -> Vec<TabId> {
        tabs.iter().filter_map(|tab| tab.id).collect()
    }

    fn reduce_loaded(tabs: &[Tab], action: TablinerAction) -> ReduceResult<TabCollection> {
        reduce_tabs(Some(tabs), &[], &action)
    }

    #[test]
    fn test_insert_tab_positions() {
        let cases = [
            (1, 0, 0),
            (1, 1, 1),
            (1, 2, 2),
            (2, 0, 2),
            (2, 1, 3),
            (2, 2, 4),
            (3, 0, 4),
        ];
        for (window_id, index, final_position) in cases {
            let new_tab = Tab::new(1234, window_id, index).with_title("new");
            let new_tabs = insert_tab(two_windows_two_tabs_each(), new_tab).unwrap();
            let position = new_tabs.iter().position(|tab| tab.has_id(1234));
            assert_eq!(
                position,
                Some(final_position),
                "window {} index {}",
                window_id,
                index
            );
        }
    }

    #[test]
    fn test_insert_without_predecessor_goes_before_first_tab() {
        let new_tabs = insert_tab(two_windows_two_tabs_each(), Tab::new(50, 2, 7)).unwrap();
        assert_eq!(ids(&new_tabs), vec![10, 11, 50, 12, 13]);
    }

    #[test]
    fn test_insert_nonzero_index_into_empty_window_fails() {
        let result = insert_tab(two_windows_two_tabs_each(), Tab::new(50, 9, 1));
        assert_eq!(
            result,
            Err(ReduceError::NonZeroIndexInEmptyWindow {
                window_id: 9,
                index: 1
            })
        );
    }

    #[test]
    fn test_move_translates_window_positions() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabMoved {
                tab_id: 13,
                move_info: MoveInfo {
                    window_id: 2,
                    from_index: 1,
                    to_index: 0,
                },
            },
        )
        .unwrap();

        let expected = vec![
            tabs[0].clone(),
            tabs[1].clone(),
            Tab {
                index: 0,
                ..tabs[3].clone()
            },
            Tab {
                index: 1,
                ..tabs[2].clone()
            },
        ];
        assert_eq!(result.chrome_tabs, Some(expected));
    }

    #[test]
    fn test_move_forward_within_window() {
        let tabs = vec![
            Tab::new(1, 1, 0),
            Tab::new(2, 1, 1),
            Tab::new(3, 1, 2),
            Tab::new(4, 2, 0),
        ];
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabMoved {
                tab_id: 1,
                move_info: MoveInfo {
                    window_id: 1,
                    from_index: 0,
                    to_index: 2,
                },
            },
        )
        .unwrap();
        let new_tabs = result.chrome_tabs.unwrap();
        assert_eq!(ids(&new_tabs), vec![2, 3, 1, 4]);
        assert_eq!(new_tabs[2].index, 2);
    }

    #[test]
    fn test_move_with_wrong_tab_id_fails() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabMoved {
                tab_id: 12,
                move_info: MoveInfo {
                    window_id: 2,
                    from_index: 1,
                    to_index: 0,
                },
            },
        );
        assert_eq!(
            result,
            Err(ReduceError::MovedTabNotFound {
                tab_id: 12,
                window_id: 2,
                from_index: 1
            })
        );
    }

    #[test]
    fn test_move_past_window_end_fails() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabMoved {
                tab_id: 10,
                move_info: MoveInfo {
                    window_id: 1,
                    from_index: 0,
                    to_index: 2,
                },
            },
        );
        assert!(matches!(
            result,
            Err(ReduceError::MoveTargetOutOfRange { tab_id: 10, .. })
        ));
    }

    #[test]
    fn test_remove_reindexes_window() {
        let tabs = vec![Tab::new(1, 1, 0), Tab::new(2, 1, 1), Tab::new(3, 1, 2)];
        let result = reduce_loaded(&tabs, TablinerAction::TabRemoved { tab_id: 2 }).unwrap();
        let new_tabs = result.chrome_tabs.unwrap();
        assert_eq!(ids(&new_tabs), vec![1, 3]);
        assert_eq!(new_tabs[1].index, 1);
    }

    #[test]
    fn test_remove_unknown_tab_is_noop() {
        let tabs = chrome_tabs();
        let result = reduce_loaded(&tabs, TablinerAction::TabRemoved { tab_id: 77 }).unwrap();
        assert_eq!(result.chrome_tabs, Some(tabs));
    }

    #[test]
    fn test_update_replaces_in_place() {
        let tabs = two_windows_two_tabs_each();
        let updated = tabs[1].clone().with_title("Renamed");
        let result = reduce_loaded(&tabs, TablinerAction::TabUpdated { tab: updated }).unwrap();
        let new_tabs = result.chrome_tabs.unwrap();
        assert_eq!(new_tabs[1].title, "Renamed");
        assert_eq!(ids(&new_tabs), ids(&tabs));
    }

    #[test]
    fn test_update_keeps_stored_index() {
        let tabs = two_windows_two_tabs_each();
        let updated = Tab {
            index: 0,
            ..tabs[3].clone().with_title("Renamed")
        };
        let result = reduce_loaded(&tabs, TablinerAction::TabUpdated { tab: updated }).unwrap();
        let new_tabs = result.chrome_tabs.unwrap();
        assert_eq!(ids(&new_tabs), ids(&tabs));
        assert_eq!(new_tabs[3].index, 1);
        assert_eq!(new_tabs[3].title, "Renamed");
        verify_tab_order(&new_tabs).unwrap();
    }

    #[test]
    fn test_update_from_another_window_fails() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabUpdated {
                tab: Tab::new(10, 2, 0),
            },
        );
        assert_eq!(
            result,
            Err(ReduceError::UpdateWindowMismatch {
                tab_id: 10,
                reported: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_activate_only_touches_its_window() {
        let mut tabs = two_windows_two_tabs_each();
        tabs[0].active = true;
        tabs[2].active = true;

        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabActivated {
                tab_id: 11,
                window_id: 1,
            },
        )
        .unwrap();
        let active: Vec<bool> = result
            .chrome_tabs
            .unwrap()
            .iter()
            .map(|tab| tab.active)
            .collect();
        assert_eq!(active, vec![false, true, true, false]);
    }

    #[test]
    fn test_detach_and_attach_round_trip() {
        let tabs = two_windows_two_tabs_each();
        let detached = reduce_loaded(
            &tabs,
            TablinerAction::TabDetached {
                tab_id: 11,
                detach_info: DetachInfo {
                    old_window_id: 1,
                    old_position: 1,
                },
            },
        )
        .unwrap();
        let after_detach = detached.chrome_tabs.clone().unwrap();
        assert_eq!(ids(&after_detach), vec![10, 12, 13]);
        assert_eq!(ids(&detached.detached_tabs), vec![11]);

        let attached = reduce_tabs(
            Some(&after_detach),
            &detached.detached_tabs,
            &TablinerAction::TabAttached {
                tab_id: 11,
                attach_info: AttachInfo {
                    new_window_id: 2,
                    new_position: 1,
                },
            },
        )
        .unwrap();
        let after_attach = attached.chrome_tabs.unwrap();
        assert_eq!(ids(&after_attach), vec![10, 12, 11, 13]);
        assert!(attached.detached_tabs.is_empty());
        assert_eq!(after_attach[2].window_id, 2);
        assert_eq!(after_attach[2].index, 1);
        assert_eq!(after_attach[2].title, tabs[1].title);
        verify_tab_order(&after_attach).unwrap();
    }

    #[test]
    fn test_detach_with_wrong_position_fails() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabDetached {
                tab_id: 11,
                detach_info: DetachInfo {
                    old_window_id: 1,
                    old_position: 0,
                },
            },
        );
        assert_eq!(
            result,
            Err(ReduceError::DetachPositionMismatch {
                tab_id: 11,
                reported: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn test_detach_with_wrong_window_fails() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabDetached {
                tab_id: 11,
                detach_info: DetachInfo {
                    old_window_id: 2,
                    old_position: 1,
                },
            },
        );
        assert!(matches!(
            result,
            Err(ReduceError::DetachWindowMismatch { tab_id: 11, .. })
        ));
    }

    #[test]
    fn test_attach_unknown_tab_fails() {
        let tabs = two_windows_two_tabs_each();
        let result = reduce_loaded(
            &tabs,
            TablinerAction::TabAttached {
                tab_id: 99,
                attach_info: AttachInfo {
                    new_window_id: 1,
                    new_position: 0,
                },
            },
        );
        assert_eq!(result, Err(ReduceError::AttachedTabNotDetached(99)));
    }

    #[test]
    fn test_actions_before_load_are_ignored() {
        let result = reduce_tabs(None, &[], &TablinerAction::TabRemoved { tab_id: 1 }).unwrap();
        assert_eq!(result, TabCollection::default());
    }

    #[test]
    fn test_bulk_load_replaces_collection() {
        let tabs = chrome_tabs();
        let result = reduce_tabs(
            Some(&two_windows_two_tabs_each()),
            &[],
            &TablinerAction::BulkLoadTabs { tabs: tabs.clone() },
        )
        .unwrap();
        assert_eq!(result.chrome_tabs, Some(tabs));
    }

    #[test]
    fn test_bulk_load_drops_pending_detach() {
        let tabs = two_windows_two_tabs_each();
        let detach = TablinerAction::TabDetached {
            tab_id: 11,
            detach_info: DetachInfo {
                old_window_id: 1,
                old_position: 1,
            },
        };
        let detached = reduce_loaded(&tabs, detach.clone()).unwrap();
        assert_eq!(ids(&detached.detached_tabs), vec![11]);

        let mut fresh = tabs.clone();
        fresh[1] = fresh[1].clone().with_title("fresh");
        let reloaded = reduce_tabs(
            detached.chrome_tabs.as_deref(),
            &detached.detached_tabs,
            &TablinerAction::BulkLoadTabs {
                tabs: fresh.clone(),
            },
        )
        .unwrap();
        assert!(reloaded.detached_tabs.is_empty());

        let detached = reduce_tabs(
            reloaded.chrome_tabs.as_deref(),
            &reloaded.detached_tabs,
            &detach,
        )
        .unwrap();
        let attached = reduce_tabs(
            detached.chrome_tabs.as_deref(),
            &detached.detached_tabs,
            &TablinerAction::TabAttached {
                tab_id: 11,
                attach_info: AttachInfo {
                    new_window_id: 2,
                    new_position: 0,
                },
            },
        )
        .unwrap();
        let after_attach = attached.chrome_tabs.unwrap();
        assert!(attached.detached_tabs.is_empty());
        assert_eq!(ids(&after_attach), vec![10, 11, 12, 13]);
        assert_eq!(after_attach[1].title, "fresh");
    }

    #[test]
    fn test_verify_tab_order_accepts_fixtures() {
        verify_tab_order(&chrome_tabs()).unwrap();
        verify_tab_order(&two_windows_two_tabs_each()).unwrap();
        verify_tab_order(&[]).unwrap();
    }

    #[test]
    fn test_verify_tab_order_rejects_gaps() {
        let tabs = vec![Tab::new(1, 1, 0), Tab::new(2, 1, 2)];
        assert!(matches!(
            verify_tab_order(&tabs),
            Err(ReduceError::TabsOutOfOrder { position: 1, .. })
        ));
    }

    #[test]
    fn test_verify_tab_order_rejects_nonzero_start() {
        let tabs = vec![Tab::new(1, 1, 0), Tab::new(2, 2, 1)];
        assert!(matches!(
            verify_tab_order(&tabs),
            Err(ReduceError::TabsOutOfOrder { position: 1, .. })
        ));
        assert!(verify_tab_order(&[Tab::new(1, 1, 1)]).is_err());
    }

    #[test]
    fn test_verify_tab_order_rejects_interleaved_windows() {
        let tabs = vec![Tab::new(1, 1, 0), Tab::new(2, 2, 0), Tab::new(3, 1, 0)];
        assert!(matches!(
            verify_tab_order(&tabs),
            Err(ReduceError::TabsOutOfOrder { position: 2, .. })
        ));
    }
}
