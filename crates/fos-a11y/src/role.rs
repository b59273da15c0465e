//! ARIA Roles
//!
//! Role enumeration (WAI-ARIA 1.2), role categories, the HTML implicit-role
//! table and explicit-role resolution.

use fos_dom::{DomAccess, NodeId};

use crate::aria::LiveRegionMode;

/// ARIA role - WAI-ARIA 1.2 roles plus the internal `StaticText` leaf role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // === Landmark Roles ===
    Banner,
    Complementary,
    ContentInfo,
    Form,
    Main,
    Navigation,
    Region,
    Search,

    // === Widget Roles ===
    Button,
    Checkbox,
    Combobox,
    Grid,
    GridCell,
    Link,
    Listbox,
    Menu,
    MenuBar,
    MenuItem,
    MenuItemCheckbox,
    MenuItemRadio,
    Option,
    ProgressBar,
    Radio,
    RadioGroup,
    ScrollBar,
    SearchBox,
    Slider,
    SpinButton,
    Switch,
    Tab,
    TabList,
    TabPanel,
    TextBox,
    Tree,
    TreeGrid,
    TreeItem,
    Meter,

    // === Document Structure Roles ===
    Application,
    Article,
    Blockquote,
    Caption,
    Cell,
    Code,
    ColumnHeader,
    Definition,
    Deletion,
    Directory,
    Document,
    Emphasis,
    Feed,
    Figure,
    Generic,
    Group,
    Heading,
    Img,
    Insertion,
    List,
    ListItem,
    Math,
    None,
    Note,
    Paragraph,
    Presentation,
    Row,
    RowGroup,
    RowHeader,
    Separator,
    Strong,
    Subscript,
    Superscript,
    Table,
    Term,
    Time,
    Toolbar,

    // === Live Region Roles ===
    Alert,
    Log,
    Marquee,
    Status,
    Timer,

    // === Window Roles ===
    AlertDialog,
    Dialog,
    ToolTip,

    // === Abstract Roles - for inheritance only ===
    Command,
    Composite,
    Input,
    Landmark,
    Range,
    Roletype,
    Section,
    Sectionhead,
    Select,
    Structure,
    Widget,
    Window,

    /// Text node leaf; never parsed from markup
    StaticText,
}

impl AriaRole {
    /// Parse a single role token
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "banner" => Self::Banner,
            "complementary" => Self::Complementary,
            "contentinfo" => Self::ContentInfo,
            "form" => Self::Form,
            "main" => Self::Main,
            "navigation" => Self::Navigation,
            "region" => Self::Region,
            "search" => Self::Search,

            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "combobox" => Self::Combobox,
            "grid" => Self::Grid,
            "gridcell" => Self::GridCell,
            "link" => Self::Link,
            "listbox" => Self::Listbox,
            "menu" => Self::Menu,
            "menubar" => Self::MenuBar,
            "menuitem" => Self::MenuItem,
            "menuitemcheckbox" => Self::MenuItemCheckbox,
            "menuitemradio" => Self::MenuItemRadio,
            "option" => Self::Option,
            "progressbar" => Self::ProgressBar,
            "radio" => Self::Radio,
            "radiogroup" => Self::RadioGroup,
            "scrollbar" => Self::ScrollBar,
            "searchbox" => Self::SearchBox,
            "slider" => Self::Slider,
            "spinbutton" => Self::SpinButton,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "textbox" => Self::TextBox,
            "tree" => Self::Tree,
            "treegrid" => Self::TreeGrid,
            "treeitem" => Self::TreeItem,
            "meter" => Self::Meter,

            "application" => Self::Application,
            "article" => Self::Article,
            "blockquote" => Self::Blockquote,
            "caption" => Self::Caption,
            "cell" => Self::Cell,
            "code" => Self::Code,
            "columnheader" => Self::ColumnHeader,
            "definition" => Self::Definition,
            "deletion" => Self::Deletion,
            "directory" => Self::Directory,
            "document" => Self::Document,
            "emphasis" => Self::Emphasis,
            "feed" => Self::Feed,
            "figure" => Self::Figure,
            "generic" => Self::Generic,
            "group" => Self::Group,
            "heading" => Self::Heading,
            "img" | "image" => Self::Img,
            "insertion" => Self::Insertion,
            "list" => Self::List,
            "listitem" => Self::ListItem,
            "math" => Self::Math,
            "none" => Self::None,
            "note" => Self::Note,
            "paragraph" => Self::Paragraph,
            "presentation" => Self::Presentation,
            "row" => Self::Row,
            "rowgroup" => Self::RowGroup,
            "rowheader" => Self::RowHeader,
            "separator" => Self::Separator,
            "strong" => Self::Strong,
            "subscript" => Self::Subscript,
            "superscript" => Self::Superscript,
            "table" => Self::Table,
            "term" => Self::Term,
            "time" => Self::Time,
            "toolbar" => Self::Toolbar,

            "alert" => Self::Alert,
            "log" => Self::Log,
            "marquee" => Self::Marquee,
            "status" => Self::Status,
            "timer" => Self::Timer,

            "alertdialog" => Self::AlertDialog,
            "dialog" => Self::Dialog,
            "tooltip" => Self::ToolTip,

            "command" => Self::Command,
            "composite" => Self::Composite,
            "input" => Self::Input,
            "landmark" => Self::Landmark,
            "range" => Self::Range,
            "roletype" => Self::Roletype,
            "section" => Self::Section,
            "sectionhead" => Self::Sectionhead,
            "select" => Self::Select,
            "structure" => Self::Structure,
            "widget" => Self::Widget,
            "window" => Self::Window,

            _ => return None,
        })
    }

    /// ARIA name of the role, as spoken
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Complementary => "complementary",
            Self::ContentInfo => "contentinfo",
            Self::Form => "form",
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Region => "region",
            Self::Search => "search",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Combobox => "combobox",
            Self::Grid => "grid",
            Self::GridCell => "gridcell",
            Self::Link => "link",
            Self::Listbox => "listbox",
            Self::Menu => "menu",
            Self::MenuBar => "menubar",
            Self::MenuItem => "menuitem",
            Self::MenuItemCheckbox => "menuitemcheckbox",
            Self::MenuItemRadio => "menuitemradio",
            Self::Option => "option",
            Self::ProgressBar => "progressbar",
            Self::Radio => "radio",
            Self::RadioGroup => "radiogroup",
            Self::ScrollBar => "scrollbar",
            Self::SearchBox => "searchbox",
            Self::Slider => "slider",
            Self::SpinButton => "spinbutton",
            Self::Switch => "switch",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::TextBox => "textbox",
            Self::Tree => "tree",
            Self::TreeGrid => "treegrid",
            Self::TreeItem => "treeitem",
            Self::Meter => "meter",
            Self::Application => "application",
            Self::Article => "article",
            Self::Blockquote => "blockquote",
            Self::Caption => "caption",
            Self::Cell => "cell",
            Self::Code => "code",
            Self::ColumnHeader => "columnheader",
            Self::Definition => "definition",
            Self::Deletion => "deletion",
            Self::Directory => "directory",
            Self::Document => "document",
            Self::Emphasis => "emphasis",
            Self::Feed => "feed",
            Self::Figure => "figure",
            Self::Generic => "generic",
            Self::Group => "group",
            Self::Heading => "heading",
            Self::Img => "img",
            Self::Insertion => "insertion",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Math => "math",
            Self::None => "none",
            Self::Note => "note",
            Self::Paragraph => "paragraph",
            Self::Presentation => "presentation",
            Self::Row => "row",
            Self::RowGroup => "rowgroup",
            Self::RowHeader => "rowheader",
            Self::Separator => "separator",
            Self::Strong => "strong",
            Self::Subscript => "subscript",
            Self::Superscript => "superscript",
            Self::Table => "table",
            Self::Term => "term",
            Self::Time => "time",
            Self::Toolbar => "toolbar",
            Self::Alert => "alert",
            Self::Log => "log",
            Self::Marquee => "marquee",
            Self::Status => "status",
            Self::Timer => "timer",
            Self::AlertDialog => "alertdialog",
            Self::Dialog => "dialog",
            Self::ToolTip => "tooltip",
            Self::Command => "command",
            Self::Composite => "composite",
            Self::Input => "input",
            Self::Landmark => "landmark",
            Self::Range => "range",
            Self::Roletype => "roletype",
            Self::Section => "section",
            Self::Sectionhead => "sectionhead",
            Self::Select => "select",
            Self::Structure => "structure",
            Self::Widget => "widget",
            Self::Window => "window",
            Self::StaticText => "text",
        }
    }

    /// Check if role is widget (interactive)
    pub fn is_widget(&self) -> bool {
        matches!(self,
            Self::Button | Self::Checkbox | Self::Combobox | Self::Grid |
            Self::GridCell | Self::Link | Self::Listbox | Self::Menu |
            Self::MenuBar | Self::MenuItem | Self::MenuItemCheckbox |
            Self::MenuItemRadio | Self::Option | Self::ProgressBar |
            Self::Radio | Self::RadioGroup | Self::ScrollBar | Self::SearchBox |
            Self::Slider | Self::SpinButton | Self::Switch | Self::Tab |
            Self::TabList | Self::TabPanel | Self::TextBox | Self::Tree |
            Self::TreeGrid | Self::TreeItem | Self::Meter
        )
    }

    /// Check if role is landmark
    pub fn is_landmark(&self) -> bool {
        matches!(self,
            Self::Banner | Self::Complementary | Self::ContentInfo |
            Self::Form | Self::Main | Self::Navigation | Self::Region | Self::Search
        )
    }

    /// Check if role is live region
    pub fn is_live_region(&self) -> bool {
        matches!(self, Self::Alert | Self::Log | Self::Marquee | Self::Status | Self::Timer)
    }

    /// Implicit `aria-live` value of live region roles
    pub fn implicit_live_region(&self) -> Option<LiveRegionMode> {
        match self {
            Self::Alert => Some(LiveRegionMode::Assertive),
            Self::Log | Self::Status => Some(LiveRegionMode::Polite),
            Self::Marquee | Self::Timer => Some(LiveRegionMode::Off),
            _ => None,
        }
    }

    /// Check if role is abstract (not for direct use)
    pub fn is_abstract(&self) -> bool {
        matches!(self,
            Self::Command | Self::Composite | Self::Input | Self::Landmark |
            Self::Range | Self::Roletype | Self::Section | Self::Sectionhead |
            Self::Select | Self::Structure | Self::Widget | Self::Window
        )
    }

    /// Roles that are never announced; their nodes splice into the parent
    pub fn is_structural(&self) -> bool {
        matches!(self,
            Self::Generic | Self::Paragraph | Self::Emphasis | Self::Strong |
            Self::Code | Self::Subscript | Self::Superscript | Self::Deletion |
            Self::Insertion | Self::Time | Self::Caption
        )
    }

    /// `role="presentation"` and its synonym `role="none"`
    pub fn is_presentational(&self) -> bool {
        matches!(self, Self::Presentation | Self::None)
    }

    /// Roles only exposed when they carry an accessible name
    pub fn requires_name(&self) -> bool {
        matches!(self, Self::Form | Self::Region)
    }

    /// Check if role supports name from content
    pub fn supports_name_from_content(&self) -> bool {
        matches!(self,
            Self::Button | Self::Cell | Self::Checkbox | Self::ColumnHeader |
            Self::GridCell | Self::Heading | Self::Link | Self::MenuItem |
            Self::MenuItemCheckbox | Self::MenuItemRadio | Self::Option |
            Self::Radio | Self::Row | Self::RowHeader | Self::Switch |
            Self::Tab | Self::ToolTip | Self::TreeItem | Self::StaticText
        )
    }

    /// Roles whose descendants are not exposed
    pub fn has_presentational_children(&self) -> bool {
        matches!(self,
            Self::Button | Self::Checkbox | Self::Img | Self::Math |
            Self::Meter | Self::MenuItemCheckbox | Self::MenuItemRadio |
            Self::Option | Self::ProgressBar | Self::Radio | Self::ScrollBar |
            Self::Separator | Self::Slider | Self::Switch | Self::Tab
        )
    }

    /// Roles announced with an enter and an "end of" boundary
    pub fn is_container(&self) -> bool {
        matches!(self,
            Self::Document | Self::Application | Self::Region | Self::Banner |
            Self::Complementary | Self::ContentInfo | Self::Form | Self::Main |
            Self::Navigation | Self::Search | Self::Article | Self::Dialog |
            Self::AlertDialog | Self::List | Self::Table | Self::Grid |
            Self::TreeGrid | Self::RowGroup | Self::Tree | Self::Menu |
            Self::MenuBar | Self::Listbox | Self::TabList | Self::TabPanel |
            Self::RadioGroup | Self::Group | Self::Toolbar | Self::Figure |
            Self::Feed | Self::Log | Self::Status | Self::Alert | Self::Note |
            Self::Blockquote | Self::Directory
        )
    }

    /// Roles that take part in a set (position/size)
    pub fn is_set_member(&self) -> bool {
        matches!(self,
            Self::Tab | Self::ListItem | Self::Radio | Self::MenuItem |
            Self::MenuItemCheckbox | Self::MenuItemRadio | Self::Option |
            Self::Row | Self::TreeItem
        )
    }

    /// Roles whose value is spoken
    pub fn has_value(&self) -> bool {
        matches!(self,
            Self::TextBox | Self::SearchBox | Self::Combobox | Self::Slider |
            Self::SpinButton | Self::ProgressBar | Self::Meter | Self::ScrollBar
        )
    }

    /// Roles the form-control rotor stops on
    pub fn is_form_control(&self) -> bool {
        matches!(self,
            Self::Button | Self::Checkbox | Self::Combobox | Self::Listbox |
            Self::Radio | Self::SearchBox | Self::Slider | Self::SpinButton |
            Self::Switch | Self::TextBox
        )
    }
}

/// Elements that take no explicit role
const ROLELESS_TAGS: &[&str] = &[
    "html", "head", "body", "script", "style", "template", "meta", "link", "title", "base",
];

/// Sectioning content that scopes `header`/`footer` away from landmarks
const SECTIONING_TAGS: &[&str] = &["article", "aside", "main", "nav", "section"];

/// Resolve the role of an element.
///
/// Returns `None` for non-elements and for generic/structural roles.
pub fn resolve_role<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Option<AriaRole> {
    let tag = doc.tag_name(node)?;
    let role = explicit_role(doc, node, tag).or_else(|| implicit_role(doc, node))?;
    if role.is_structural() {
        return None;
    }
    Some(role)
}

/// First usable token of the `role` attribute
pub fn explicit_role<D: DomAccess + ?Sized>(doc: &D, node: NodeId, tag: &str) -> Option<AriaRole> {
    if ROLELESS_TAGS.contains(&tag) {
        return None;
    }
    let value = doc.attribute(node, "role")?;
    for token in value.split_whitespace() {
        let Some(role) = AriaRole::parse(token) else { continue };
        if role.is_abstract() {
            tracing::trace!(?node, token, "skipping abstract role");
            continue;
        }
        if role.requires_name() && !has_author_name(doc, node) {
            tracing::trace!(?node, token, "skipping unnamed landmark role");
            continue;
        }
        if role.is_presentational() && has_presentation_conflict(doc, node) {
            tracing::trace!(?node, "presentational role overridden");
            continue;
        }
        return Some(role);
    }
    None
}

/// Name supplied by the author rather than derived from content
pub fn has_author_name<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    let non_blank = |name: &str| doc.attribute(node, name).is_some_and(|v| !v.trim().is_empty());
    non_blank("aria-label")
        || non_blank("title")
        || doc
            .attribute(node, "aria-labelledby")
            .is_some_and(|v| !doc.resolve_id_refs(v).is_empty())
}

/// Global ARIA attributes that keep a presentational element exposed
const GLOBAL_ARIA_ATTRS: &[&str] = &[
    "aria-label", "aria-labelledby", "aria-describedby", "aria-description",
    "aria-details", "aria-live", "aria-owns", "aria-controls", "aria-flowto",
    "aria-errormessage", "aria-keyshortcuts", "aria-roledescription",
];

/// A presentational role is ignored on focusable elements or when global
/// ARIA attributes are present
pub fn has_presentation_conflict<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    doc.is_focusable(node) || GLOBAL_ARIA_ATTRS.iter().any(|a| doc.has_attribute(node, a))
}

/// HTML-AAM implicit role of an element
pub fn implicit_role<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Option<AriaRole> {
    let tag = doc.tag_name(node)?;
    if inherits_presentation(doc, node, tag) {
        return Some(AriaRole::Presentation);
    }
    Some(match tag {
        "a" | "area" => {
            if doc.has_attribute(node, "href") { AriaRole::Link } else { AriaRole::Generic }
        }
        "article" => AriaRole::Article,
        "aside" => AriaRole::Complementary,
        "blockquote" => AriaRole::Blockquote,
        "button" => AriaRole::Button,
        "caption" => AriaRole::Caption,
        "code" => AriaRole::Code,
        "datalist" => AriaRole::Listbox,
        "dd" => AriaRole::Definition,
        "del" | "s" => AriaRole::Deletion,
        "details" => AriaRole::Group,
        "dfn" | "dt" => AriaRole::Term,
        "dl" => AriaRole::List,
        "dialog" => AriaRole::Dialog,
        "em" => AriaRole::Emphasis,
        "fieldset" | "optgroup" => AriaRole::Group,
        "figure" => AriaRole::Figure,
        "footer" => {
            if is_scoped_to_sectioning(doc, node) { AriaRole::Generic } else { AriaRole::ContentInfo }
        }
        "form" => AriaRole::Form,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => AriaRole::Heading,
        "header" => {
            if is_scoped_to_sectioning(doc, node) { AriaRole::Generic } else { AriaRole::Banner }
        }
        "hr" => AriaRole::Separator,
        "img" => match doc.attribute(node, "alt") {
            Some("") if !has_presentation_conflict(doc, node) => AriaRole::Presentation,
            _ => AriaRole::Img,
        },
        "input" => return input_role(doc, node),
        "ins" => AriaRole::Insertion,
        "li" => AriaRole::ListItem,
        "main" => AriaRole::Main,
        "math" => AriaRole::Math,
        "menu" | "ol" | "ul" => AriaRole::List,
        "meter" => AriaRole::Meter,
        "nav" => AriaRole::Navigation,
        "option" => AriaRole::Option,
        "output" => AriaRole::Status,
        "p" => AriaRole::Paragraph,
        "progress" => AriaRole::ProgressBar,
        "search" => AriaRole::Search,
        "section" => AriaRole::Region,
        "select" => {
            let size = doc
                .attribute(node, "size")
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0);
            if doc.has_attribute(node, "multiple") || size > 1 {
                AriaRole::Listbox
            } else {
                AriaRole::Combobox
            }
        }
        "strong" | "b" => AriaRole::Strong,
        "sub" => AriaRole::Subscript,
        "summary" => AriaRole::Button,
        "sup" => AriaRole::Superscript,
        "svg" => AriaRole::Img,
        "table" => AriaRole::Table,
        "tbody" | "tfoot" | "thead" => AriaRole::RowGroup,
        "td" => AriaRole::Cell,
        "textarea" => AriaRole::TextBox,
        "th" => match doc.attribute(node, "scope") {
            Some("row" | "rowgroup") => AriaRole::RowHeader,
            _ => AriaRole::ColumnHeader,
        },
        "time" => AriaRole::Time,
        "tr" => AriaRole::Row,
        _ => AriaRole::Generic,
    })
}

/// Required owned elements of a presentational table or list are
/// presentational too
fn inherits_presentation<D: DomAccess + ?Sized>(doc: &D, node: NodeId, tag: &str) -> bool {
    let owner_tags: &[&str] = match tag {
        "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" | "caption" => &["table"],
        "li" => &["ul", "ol", "menu"],
        _ => return false,
    };
    let mut current = doc.parent(node);
    while let Some(ancestor) = current {
        let Some(ancestor_tag) = doc.tag_name(ancestor) else { return false };
        if owner_tags.contains(&ancestor_tag) {
            return explicit_role(doc, ancestor, ancestor_tag).is_some_and(|r| r.is_presentational());
        }
        current = doc.parent(ancestor);
    }
    false
}

fn input_role<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Option<AriaRole> {
    let kind = doc
        .attribute(node, "type")
        .map(|t| t.trim().to_ascii_lowercase())
        .unwrap_or_default();
    let has_list = doc.has_attribute(node, "list");
    Some(match kind.as_str() {
        "button" | "image" | "reset" | "submit" => AriaRole::Button,
        "checkbox" => AriaRole::Checkbox,
        "radio" => AriaRole::Radio,
        "range" => AriaRole::Slider,
        "number" => AriaRole::SpinButton,
        "hidden" => return None,
        "search" if !has_list => AriaRole::SearchBox,
        "" | "text" | "email" | "tel" | "url" | "search" | "password" => {
            if has_list { AriaRole::Combobox } else { AriaRole::TextBox }
        }
        _ => AriaRole::TextBox,
    })
}

fn is_scoped_to_sectioning<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    let mut current = doc.parent(node);
    while let Some(ancestor) = current {
        if let Some(tag) = doc.tag_name(ancestor) {
            if SECTIONING_TAGS.contains(&tag) {
                return true;
            }
            if let Some(role) = doc.attribute(ancestor, "role").and_then(AriaRole::parse) {
                if matches!(role,
                    AriaRole::Article | AriaRole::Complementary | AriaRole::Main |
                    AriaRole::Navigation | AriaRole::Region
                ) {
                    return true;
                }
            }
        }
        current = doc.parent(ancestor);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(AriaRole::parse("button"), Some(AriaRole::Button));
        assert_eq!(AriaRole::parse("NAVIGATION"), Some(AriaRole::Navigation));
        assert_eq!(AriaRole::parse("bogus"), None);
        assert!(AriaRole::Button.is_widget());
        assert!(AriaRole::Navigation.is_landmark());
        assert!(AriaRole::Widget.is_abstract());
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for role in [AriaRole::ContentInfo, AriaRole::MenuItemRadio, AriaRole::TabPanel] {
            assert_eq!(AriaRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_categories() {
        assert!(AriaRole::Navigation.is_container());
        assert!(!AriaRole::Heading.is_container());
        assert!(AriaRole::Option.is_set_member());
        assert!(AriaRole::Generic.is_structural());
        assert!(AriaRole::None.is_presentational());
        assert!(AriaRole::Button.has_presentational_children());
    }
}
