// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::buffer::Location;
use crate::error::EditorError;
use crate::{BufferId, WindowId};
use slotmap::SlotMap;
use std::collections::HashMap;

/// How a split divides its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Side by side: the width is divided.
    Horizontal,
    /// Stacked: the height is divided.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

/// A highlighted run of text, `start` inclusive to `end` exclusive. `face`
/// names a color in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub start: Location,
    pub end: Location,
    pub face: &'static str,
}

impl Highlight {
    pub fn contains(&self, at: Location) -> bool {
        self.start <= at && at < self.end
    }
}

/// Per-window view state over a buffer.
#[derive(Debug, Clone)]
pub struct View {
    pub buffer: BufferId,
    /// First buffer line shown at the top of the window.
    pub scroll_offset: usize,
    /// Recenter the cursor line on the next scroll adjustment.
    pub center_pending: bool,
    pub highlights: Vec<Highlight>,
    /// Named positions set with `m` and recalled with `'`.
    pub marks: HashMap<char, Location>,
}

impl View {
    pub fn new(buffer: BufferId) -> Self {
        Self {
            buffer,
            scroll_offset: 0,
            center_pending: false,
            highlights: Vec::new(),
            marks: HashMap::new(),
        }
    }

    /// Keep `cursor_line` visible in a window `height` rows tall, the last of
    /// which is the status bar.
    pub fn adjust_scroll(&mut self, height: usize, cursor_line: usize) {
        let line = cursor_line as isize;
        let h = height as isize;
        let offset = self.scroll_offset as isize;
        if self.center_pending {
            self.scroll_offset = (line - (h - 1).div_euclid(2)).max(1) as usize;
            self.center_pending = false;
        } else if line > h - 1 + offset {
            self.scroll_offset = (line - h + 2).max(0) as usize;
        } else if line < offset {
            self.scroll_offset = cursor_line;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowNode {
    Leaf(WindowId),
    Split {
        orientation: Orientation,
        left: Box<WindowNode>,
        right: Box<WindowNode>,
    },
}

impl WindowNode {
    fn is_leaf(&self, target: WindowId) -> bool {
        matches!(self, WindowNode::Leaf(id) if *id == target)
    }

    fn contains(&self, target: WindowId) -> bool {
        match self {
            WindowNode::Leaf(id) => *id == target,
            WindowNode::Split { left, right, .. } => {
                left.contains(target) || right.contains(target)
            }
        }
    }

    fn first_leaf(&self) -> WindowId {
        match self {
            WindowNode::Leaf(id) => *id,
            WindowNode::Split { left, .. } => left.first_leaf(),
        }
    }

    fn collect_leaves(&self, out: &mut Vec<WindowId>) {
        match self {
            WindowNode::Leaf(id) => out.push(*id),
            WindowNode::Split { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    fn layout_node(&self, rect: Rect, out: &mut Vec<(WindowId, Rect)>) {
        match self {
            WindowNode::Leaf(id) => out.push((*id, rect)),
            WindowNode::Split {
                orientation,
                left,
                right,
            } => {
                let (first, second) = match orientation {
                    Orientation::Horizontal => {
                        let lw = rect.w / 2;
                        (
                            Rect::new(rect.x, rect.y, lw, rect.h),
                            Rect::new(rect.x + lw, rect.y, rect.w - lw, rect.h),
                        )
                    }
                    Orientation::Vertical => {
                        let th = rect.h / 2;
                        (
                            Rect::new(rect.x, rect.y, rect.w, th),
                            Rect::new(rect.x, rect.y + th, rect.w, rect.h - th),
                        )
                    }
                };
                left.layout_node(first, out);
                right.layout_node(second, out);
            }
        }
    }

    fn split_leaf(&mut self, target: WindowId, new: WindowId, orientation: Orientation) -> bool {
        match self {
            WindowNode::Leaf(id) if *id == target => {
                *self = WindowNode::Split {
                    orientation,
                    left: Box::new(WindowNode::Leaf(target)),
                    right: Box::new(WindowNode::Leaf(new)),
                };
                true
            }
            WindowNode::Leaf(_) => false,
            WindowNode::Split { left, right, .. } => {
                left.split_leaf(target, new, orientation)
                    || right.split_leaf(target, new, orientation)
            }
        }
    }

    /// Remove `target` and let its sibling take the parent's place. Returns
    /// the sibling's first leaf.
    fn remove_leaf(&mut self, target: WindowId) -> Option<WindowId> {
        let WindowNode::Split { left, right, .. } = self else {
            return None;
        };
        let sibling = if left.is_leaf(target) {
            Some(std::mem::replace(right.as_mut(), WindowNode::Leaf(target)))
        } else if right.is_leaf(target) {
            Some(std::mem::replace(left.as_mut(), WindowNode::Leaf(target)))
        } else {
            None
        };
        match sibling {
            Some(node) => {
                *self = node;
                Some(self.first_leaf())
            }
            None => left
                .remove_leaf(target)
                .or_else(|| right.remove_leaf(target)),
        }
    }
}

/// The split layout of the screen and the views that fill it. Exactly one
/// leaf is current at any time.
#[derive(Debug)]
pub struct WindowTree {
    views: SlotMap<WindowId, View>,
    root: WindowNode,
    current: WindowId,
}

impl WindowTree {
    pub fn new(buffer: BufferId) -> Self {
        let mut views = SlotMap::with_key();
        let current = views.insert(View::new(buffer));
        Self {
            views,
            root: WindowNode::Leaf(current),
            current,
        }
    }

    pub fn root(&self) -> &WindowNode {
        &self.root
    }

    pub fn current(&self) -> WindowId {
        self.current
    }

    /// Make `window` current.
    ///
    /// # Panics
    /// If `window` is not a leaf of this tree. A current window outside the
    /// tree would leave nothing to render or dispatch to.
    pub fn set_current(&mut self, window: WindowId) {
        assert!(
            self.root.contains(window),
            "window {window:?} is not a leaf of the window tree"
        );
        self.current = window;
    }

    pub fn view(&self, window: WindowId) -> Option<&View> {
        self.views.get(window)
    }

    pub fn view_mut(&mut self, window: WindowId) -> Option<&mut View> {
        self.views.get_mut(window)
    }

    pub fn current_view(&self) -> &View {
        &self.views[self.current]
    }

    pub fn current_view_mut(&mut self) -> &mut View {
        &mut self.views[self.current]
    }

    pub fn views_mut(&mut self) -> impl Iterator<Item = (WindowId, &mut View)> {
        self.views.iter_mut()
    }

    /// Leaves in left-to-right, top-to-bottom order.
    pub fn leaves(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Assign a rectangle to every leaf.
    pub fn layout(&self, rect: Rect) -> Vec<(WindowId, Rect)> {
        let mut out = Vec::new();
        self.root.layout_node(rect, &mut out);
        out
    }

    /// Split the current window. The new window shows the same buffer at the
    /// same scroll position and becomes current.
    pub fn split(&mut self, orientation: Orientation) -> WindowId {
        let current = self.current_view();
        let mut view = View::new(current.buffer);
        view.scroll_offset = current.scroll_offset;
        let new = self.views.insert(view);
        let split = self.root.split_leaf(self.current, new, orientation);
        debug_assert!(split, "current window missing from tree");
        self.current = new;
        new
    }

    /// Close the current window. The first leaf of its sibling becomes current.
    pub fn close_current(&mut self) -> Result<(), EditorError> {
        if self.root.is_leaf(self.current) {
            return Err(EditorError::LastWindow);
        }
        let closing = self.current;
        let next = self
            .root
            .remove_leaf(closing)
            .unwrap_or_else(|| self.root.first_leaf());
        self.views.remove(closing);
        self.set_current(next);
        Ok(())
    }

    /// Close every window but the current one.
    pub fn only(&mut self) {
        let keep = self.current;
        self.views.retain(|id, _| id == keep);
        self.root = WindowNode::Leaf(keep);
    }

    /// Move to the next leaf in tree order, wrapping around.
    pub fn next_window(&mut self) -> WindowId {
        let leaves = self.leaves();
        let index = leaves.iter().position(|id| *id == self.current).unwrap_or(0);
        let next = leaves[(index + 1) % leaves.len()];
        self.set_current(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tree() -> WindowTree {
        let mut buffers: SlotMap<BufferId, ()> = SlotMap::with_key();
        WindowTree::new(buffers.insert(()))
    }

    #[test]
    fn test_single_leaf_layout() {
        let tree = test_tree();
        let layout = tree.layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout, vec![(tree.current(), Rect::new(0, 0, 80, 24))]);
    }

    #[test]
    fn test_horizontal_split_even() {
        let mut tree = test_tree();
        let first = tree.current();
        let second = tree.split(Orientation::Horizontal);
        let layout = tree.layout(Rect::new(0, 0, 100, 30));
        assert_eq!(
            layout,
            vec![
                (first, Rect::new(0, 0, 50, 30)),
                (second, Rect::new(50, 0, 50, 30)),
            ]
        );
    }

    #[test]
    fn test_horizontal_split_odd() {
        let mut tree = test_tree();
        tree.split(Orientation::Horizontal);
        let layout = tree.layout(Rect::new(0, 0, 101, 30));
        assert_eq!(layout[0].1.w, 50);
        assert_eq!(layout[1].1.w, 51);
        assert_eq!(layout[1].1.x, 50);
    }

    #[test]
    fn test_nested_split() {
        let mut tree = test_tree();
        let a = tree.current();
        let b = tree.split(Orientation::Horizontal);
        let c = tree.split(Orientation::Vertical);
        let layout = tree.layout(Rect::new(0, 0, 100, 41));
        assert_eq!(
            layout,
            vec![
                (a, Rect::new(0, 0, 50, 41)),
                (b, Rect::new(50, 0, 50, 20)),
                (c, Rect::new(50, 20, 50, 21)),
            ]
        );
    }

    #[test]
    fn test_close_restores_sibling() {
        let mut tree = test_tree();
        let a = tree.current();
        let b = tree.split(Orientation::Horizontal);
        let c = tree.split(Orientation::Vertical);
        assert_eq!(tree.current(), c);
        tree.close_current().unwrap();
        assert_eq!(tree.current(), b);
        assert_eq!(tree.leaves(), vec![a, b]);
        assert!(tree.view(c).is_none());
        tree.close_current().unwrap();
        assert_eq!(tree.root(), &WindowNode::Leaf(a));
        assert!(matches!(tree.close_current(), Err(EditorError::LastWindow)));
    }

    #[test]
    fn test_only() {
        let mut tree = test_tree();
        tree.split(Orientation::Horizontal);
        let b = tree.split(Orientation::Vertical);
        tree.only();
        assert_eq!(tree.leaves(), vec![b]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_next_window_wraps() {
        let mut tree = test_tree();
        let a = tree.current();
        let b = tree.split(Orientation::Horizontal);
        assert_eq!(tree.next_window(), a);
        assert_eq!(tree.next_window(), b);
    }

    #[test]
    #[should_panic]
    fn test_set_current_outside_tree_panics() {
        let mut tree = test_tree();
        tree.split(Orientation::Horizontal);
        let b = tree.current();
        tree.close_current().unwrap();
        tree.set_current(b);
    }

    #[test]
    fn test_center_scroll() {
        let mut view = test_tree().current_view().clone();
        view.center_pending = true;
        view.adjust_scroll(20, 50);
        assert_eq!(view.scroll_offset, 41);
        assert!(!view.center_pending);
    }

    #[test]
    fn test_center_scroll_without_rows() {
        // No content rows: floor(-1 / 2) is -1, so the cursor line sits one
        // past the offset it would get from truncating division.
        let mut view = test_tree().current_view().clone();
        view.center_pending = true;
        view.adjust_scroll(0, 5);
        assert_eq!(view.scroll_offset, 6);
        view.center_pending = true;
        view.adjust_scroll(1, 5);
        assert_eq!(view.scroll_offset, 5);
    }

    #[test]
    fn test_scroll_past_bottom() {
        let mut view = test_tree().current_view().clone();
        view.adjust_scroll(20, 10);
        assert_eq!(view.scroll_offset, 0);
        view.adjust_scroll(20, 25);
        assert_eq!(view.scroll_offset, 7);
    }

    #[test]
    fn test_scroll_past_top() {
        let mut view = test_tree().current_view().clone();
        view.scroll_offset = 30;
        view.adjust_scroll(20, 12);
        assert_eq!(view.scroll_offset, 12);
        // Inside the viewport nothing changes.
        view.adjust_scroll(20, 20);
        assert_eq!(view.scroll_offset, 12);
    }
}
