//! Navigation table.
//!
//! Paths map to views that are loaded on first navigation. The table is
//! built once and never mutated. There are no guards, redirects or catch-all
//! entries: an undeclared path resolves to nothing.

use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

static TABLE: OnceLock<RouteTable> = OnceLock::new();

/// Every view the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    MainLayout,
    Home,
    ReportDisplay,
    ReportAnalysis,
    ExpertScore,
    Scoring,
    Login,
    Register,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainLayout => write!(f, "main_layout"),
            Self::Home => write!(f, "home"),
            Self::ReportDisplay => write!(f, "report_display"),
            Self::ReportAnalysis => write!(f, "report_analysis"),
            Self::ExpertScore => write!(f, "expert_score"),
            Self::Scoring => write!(f, "scoring"),
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "register"),
        }
    }
}

/// A loaded view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub kind: ViewKind,
    /// Module path of the view implementation
    pub component: &'static str,
}

/// A view that is resolved on first use and cached afterwards.
pub struct LazyView {
    loader: fn() -> View,
    cell: OnceLock<View>,
}

impl LazyView {
    pub const fn new(loader: fn() -> View) -> Self {
        Self {
            loader,
            cell: OnceLock::new(),
        }
    }

    /// Load the view, running the loader only the first time.
    pub fn load(&self) -> &View {
        self.cell.get_or_init(|| {
            let view = (self.loader)();
            debug!(view = %view.kind, "Loaded view");
            view
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for LazyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("loaded", &self.cell.get())
            .finish()
    }
}

/// One entry of the navigation table.
#[derive(Debug)]
pub struct RouteRecord {
    /// Path relative to the parent record; top-level paths start with `/`
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub title: Option<&'static str>,
    pub view: LazyView,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: &'static str, loader: fn() -> View) -> Self {
        Self {
            path,
            name: None,
            title: None,
            view: LazyView::new(loader),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn titled(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// A resolved path: the matched leaf plus the layouts wrapping it,
/// outermost first.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub full_path: String,
    pub chain: Vec<&'a RouteRecord>,
}

impl<'a> RouteMatch<'a> {
    pub fn record(&self) -> &'a RouteRecord {
        // chain always holds at least the leaf
        self.chain[self.chain.len() - 1]
    }

    pub fn name(&self) -> Option<&'static str> {
        self.record().name
    }

    pub fn title(&self) -> Option<&'static str> {
        self.record().title
    }

    pub fn layouts(&self) -> &[&'a RouteRecord] {
        &self.chain[..self.chain.len() - 1]
    }
}

/// Result of navigating: every view in the chain is loaded.
#[derive(Debug)]
pub struct Navigation<'a> {
    pub matched: RouteMatch<'a>,
    pub views: Vec<&'a View>,
}

impl<'a> Navigation<'a> {
    /// The innermost view, i.e. the page itself.
    pub fn view(&self) -> &'a View {
        self.views[self.views.len() - 1]
    }
}

/// A flattened row of the table, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub path: String,
    pub name: Option<&'static str>,
    pub title: Option<&'static str>,
    pub layout: Option<String>,
}

#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self { routes }
    }

    /// The application's table: a layout shell at `/` with the scoring pages
    /// nested under it, plus the standalone login and register pages.
    pub fn standard() -> Self {
        Self::new(vec![
            RouteRecord::new("/", views::main_layout).with_children(vec![
                RouteRecord::new("", views::home)
                    .named("home")
                    .titled("Home"),
                RouteRecord::new("report", views::report_display)
                    .named("report")
                    .titled("Report Display"),
                RouteRecord::new("analysis", views::report_analysis)
                    .named("analysis")
                    .titled("Report Analysis"),
                RouteRecord::new("expert", views::expert_score)
                    .named("expert")
                    .titled("Expert Scoring"),
                RouteRecord::new("scoring", views::scoring)
                    .named("scoring")
                    .titled("Scoring"),
            ]),
            RouteRecord::new("/login", views::login)
                .named("login")
                .titled("Login"),
            RouteRecord::new("/register", views::register)
                .named("register")
                .titled("Register"),
        ])
    }

    /// The process-wide standard table.
    pub fn global() -> &'static RouteTable {
        TABLE.get_or_init(RouteTable::standard)
    }

    /// Match `path` against the table without loading any view.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let target = normalize(path);
        let mut chain = Vec::new();
        for record in &self.routes {
            if let Some(full_path) = match_record(record, "", &target, &mut chain) {
                return Some(RouteMatch { full_path, chain });
            }
        }
        None
    }

    /// Resolve `path` and load every view along the matched chain.
    pub fn navigate(&self, path: &str) -> Option<Navigation<'_>> {
        let matched = self.resolve(path)?;
        let views = matched.chain.iter().map(|r| r.view.load()).collect();
        debug!(path = %matched.full_path, "Navigated");
        Some(Navigation { matched, views })
    }

    /// Find a record by route name.
    pub fn by_name(&self, name: &str) -> Option<RouteMatch<'_>> {
        let path = self
            .summaries()
            .into_iter()
            .find(|s| s.name == Some(name))?
            .path;
        self.resolve(&path)
    }

    /// Every navigable path, depth first, in declaration order.
    pub fn summaries(&self) -> Vec<RouteSummary> {
        let mut out = Vec::new();
        for record in &self.routes {
            collect(record, "", None, &mut out);
        }
        out
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return normalize(child);
    }
    normalize(&format!("{}/{}", parent, child))
}

fn match_record<'a>(
    record: &'a RouteRecord,
    parent: &str,
    target: &str,
    chain: &mut Vec<&'a RouteRecord>,
) -> Option<String> {
    let full = join(parent, record.path);
    chain.push(record);

    if record.children.is_empty() {
        if full == target {
            return Some(full);
        }
    } else {
        for child in &record.children {
            if let Some(found) = match_record(child, &full, target, chain) {
                return Some(found);
            }
        }
    }

    chain.pop();
    None
}

fn collect(
    record: &RouteRecord,
    parent: &str,
    layout: Option<&str>,
    out: &mut Vec<RouteSummary>,
) {
    let full = join(parent, record.path);
    if record.children.is_empty() {
        out.push(RouteSummary {
            path: full,
            name: record.name,
            title: record.title,
            layout: layout.map(str::to_string),
        });
        return;
    }

    for child in &record.children {
        collect(child, &full, Some(full.as_str()), out);
    }
}

mod views {
    use super::{View, ViewKind};

    pub(super) fn main_layout() -> View {
        View {
            kind: ViewKind::MainLayout,
            component: "layout/main_layout",
        }
    }

    pub(super) fn home() -> View {
        View {
            kind: ViewKind::Home,
            component: "views/home",
        }
    }

    pub(super) fn report_display() -> View {
        View {
            kind: ViewKind::ReportDisplay,
            component: "views/report_display",
        }
    }

    pub(super) fn report_analysis() -> View {
        View {
            kind: ViewKind::ReportAnalysis,
            component: "views/report_analysis",
        }
    }

    pub(super) fn expert_score() -> View {
        View {
            kind: ViewKind::ExpertScore,
            component: "views/expert_score",
        }
    }

    pub(super) fn scoring() -> View {
        View {
            kind: ViewKind::Scoring,
            component: "views/scoring",
        }
    }

    pub(super) fn login() -> View {
        View {
            kind: ViewKind::Login,
            component: "views/login",
        }
    }

    pub(super) fn register() -> View {
        View {
            kind: ViewKind::Register,
            component: "views/register",
        }
    }
}
