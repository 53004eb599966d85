//! Debug visualization of the menu tree.
//!
//! Diagnostics go through `tracing` under the targets in
//! [`quickmenu_core::logging::targets`]. To see them, install a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("quickmenu::tree=debug,quickmenu::host=trace")
//!     .init();
//! ```
//!
//! [`MenuTreeDebug`] renders the current forest for logs and tests:
//!
//! ```
//! use std::sync::Arc;
//! use quickmenu::host::RecordingHost;
//! use quickmenu::logging::{MenuTreeDebug, TreeFormatOptions, TreeStyle};
//! use quickmenu::Menu;
//!
//! let menu = Menu::new(Arc::new(RecordingHost::new()));
//! menu.create_root_page("MyMod", None).add_category("General");
//!
//! let debug = MenuTreeDebug::with_options(TreeFormatOptions {
//!     style: TreeStyle::Ascii,
//!     show_ids: false,
//!     ..Default::default()
//! });
//! let output = debug.format_forest(&menu.root_pages());
//! assert!(output.contains("`-- General (Category)"));
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use crate::element::UiElement;
use crate::page::Page;

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// What [`MenuTreeDebug`] prints for each node.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Print element IDs.
    pub show_ids: bool,
    /// Print generated/protected flags.
    pub show_state: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_state: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Names and kinds only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_state: false,
            ..Default::default()
        }
    }
}

/// Renders the menu tree as text.
#[derive(Debug, Clone, Default)]
pub struct MenuTreeDebug {
    options: TreeFormatOptions,
}

impl MenuTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every root page and its descendants.
    pub fn format_forest(&self, roots: &[Arc<Page>]) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Menu Tree ({} root pages):", roots.len());
        if roots.is_empty() {
            output.push_str("  (empty)\n");
        }
        for root in roots {
            self.format_node(&**root, 0, &mut Vec::new(), &mut output);
        }
        output
    }

    /// Format one element and its descendants.
    pub fn format_subtree(&self, root: &dyn UiElement) -> String {
        let mut output = String::new();
        self.format_node(root, 0, &mut Vec::new(), &mut output);
        output
    }

    /// `open` holds, per ancestor level, whether more siblings follow.
    fn format_node(&self, node: &dyn UiElement, depth: usize, open: &mut Vec<bool>, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let (pipe, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|   ", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
        };

        if depth > 0 {
            for &more in &open[..depth - 1] {
                output.push_str(if more { pipe } else { "    " });
            }
            output.push_str(if open[depth - 1] { tee } else { corner });
        }

        let name = node.display_name();
        output.push_str(if name.is_empty() { "(unnamed)" } else { &name });
        let _ = write!(output, " ({})", node.kind());
        if self.options.show_ids {
            let _ = write!(output, " [{}]", node.element_id());
        }
        if self.options.show_state {
            if node.is_protected() {
                output.push_str(" protected");
            }
            if node.is_generated() {
                output.push_str(" generated");
            }
        }
        output.push('\n');

        let children = node.children();
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            open.truncate(depth);
            open.push(i + 1 < count);
            self.format_node(child.as_ref(), depth + 1, open, output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Menu;
    use crate::host::RecordingHost;

    fn sample() -> Menu {
        let menu = Menu::new(Arc::new(RecordingHost::new()));
        let page = menu.create_root_page("Mod", None);
        let first = page.add_category("First");
        first.add_button("Press", None, "");
        first.add_toggle("Enabled", "", true);
        page.add_category("Second");
        menu
    }

    #[test]
    fn test_empty_forest() {
        let output = MenuTreeDebug::new().format_forest(&[]);
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_ascii_layout() {
        let menu = sample();
        let debug = MenuTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        });
        let output = debug.format_forest(&menu.root_pages());
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Menu Tree (1 root pages):",
                "Mod (MainPage) (Page)",
                "+-- First (Category)",
                "|   +-- Press (Button)",
                "|   `-- Enabled (Toggle)",
                "`-- Second (Category)",
            ]
        );
    }

    #[test]
    fn test_state_flags_and_depth_limit() {
        let menu = sample();
        menu.host_ready();
        let debug = MenuTreeDebug::with_options(TreeFormatOptions {
            max_depth: Some(0),
            ..Default::default()
        });
        let roots = menu.root_pages();
        let output = debug.format_subtree(&*roots[0]);

        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("[qm-Mod-MainPage] generated"));
    }
}
