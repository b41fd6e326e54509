//! Router Module
//!
//! Declarative route tree, path resolution and guarded navigation. Child
//! routes inherit their parent's meta; a child value overrides the parent's.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::auth::SessionState;
use crate::guard::{self, NavigationDecision};
use crate::role::Role;

/// Upper bound on redirects followed for one navigation
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteName {
    Login,
    Dashboard,
    Equipment,
    EquipmentDetail,
    Organization,
    InspectionTemplates,
    InspectionTasks,
    InspectionExecute,
    RepairOrders,
    RepairCreate,
    RepairExecute,
    Maintenance,
    MaintenancePlans,
    MaintenanceTasks,
    MaintenanceExecute,
    SpareParts,
    Analytics,
    Knowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    Main,
    FullScreen,
}

/// Capability descriptor attached to a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    pub requires_auth: Option<bool>,
    pub roles: Option<&'static [Role]>,
    pub title: Option<&'static str>,
    pub layout: Option<Layout>,
}

impl RouteMeta {
    /// Unless explicitly disabled, routes require authentication
    pub fn requires_auth(&self) -> bool {
        self.requires_auth != Some(false)
    }

    pub fn roles(&self) -> &'static [Role] {
        self.roles.unwrap_or(&[])
    }

    fn inherit(&self, parent: &RouteMeta) -> RouteMeta {
        RouteMeta {
            requires_auth: self.requires_auth.or(parent.requires_auth),
            roles: self.roles.or(parent.roles),
            title: self.title.or(parent.title),
            layout: self.layout.or(parent.layout),
        }
    }

    const fn titled(title: &'static str) -> Self {
        Self {
            requires_auth: None,
            roles: None,
            title: Some(title),
            layout: None,
        }
    }

    const fn restricted(title: &'static str, roles: &'static [Role]) -> Self {
        Self {
            requires_auth: None,
            roles: Some(roles),
            title: Some(title),
            layout: None,
        }
    }

    const fn full_screen() -> Self {
        Self {
            requires_auth: Some(true),
            roles: None,
            title: None,
            layout: Some(Layout::FullScreen),
        }
    }
}

/// One entry of the declarative route tree
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<RouteName>,
    pub meta: RouteMeta,
    pub redirect: Option<&'static str>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    fn new(path: &'static str, name: RouteName, meta: RouteMeta) -> Self {
        Self {
            path,
            name: Some(name),
            meta,
            redirect: None,
            children: Vec::new(),
        }
    }

    fn redirect_to(mut self, target: &'static str) -> Self {
        self.redirect = Some(target);
        self
    }
}

const PLANNERS: &[Role] = &[Role::Admin, Role::Engineer];

/// The application route tree
pub fn routes() -> Vec<RouteRecord> {
    use RouteName::*;

    vec![
        RouteRecord::new(
            "/login",
            Login,
            RouteMeta {
                requires_auth: Some(false),
                ..RouteMeta::default()
            },
        ),
        RouteRecord {
            path: "/",
            name: None,
            meta: RouteMeta {
                requires_auth: Some(true),
                layout: Some(Layout::Main),
                ..RouteMeta::default()
            },
            redirect: Some("/dashboard"),
            children: vec![
                RouteRecord::new("dashboard", Dashboard, RouteMeta::titled("首页")),
                RouteRecord::new("equipment", Equipment, RouteMeta::titled("设备台账")),
                RouteRecord::new(
                    "equipment/detail/:id",
                    EquipmentDetail,
                    RouteMeta::titled("设备详情"),
                ),
                RouteRecord::new(
                    "organization",
                    Organization,
                    RouteMeta::restricted("组织架构", PLANNERS),
                ),
                RouteRecord::new(
                    "inspection/templates",
                    InspectionTemplates,
                    RouteMeta::restricted("点检模板", PLANNERS),
                ),
                RouteRecord::new("inspection/tasks", InspectionTasks, RouteMeta::titled("点检任务")),
                RouteRecord::new(
                    "inspection/execute/:taskId?",
                    InspectionExecute,
                    RouteMeta::full_screen(),
                ),
                RouteRecord::new("repair/orders", RepairOrders, RouteMeta::titled("维修工单")),
                RouteRecord::new("repair/create", RepairCreate, RouteMeta::full_screen()),
                RouteRecord::new(
                    "repair/execute/:orderId?",
                    RepairExecute,
                    RouteMeta::full_screen(),
                ),
                RouteRecord::new("maintenance", Maintenance, RouteMeta::titled("保养管理"))
                    .redirect_to("/maintenance/plans"),
                RouteRecord::new(
                    "maintenance/plans",
                    MaintenancePlans,
                    RouteMeta::restricted("保养计划", PLANNERS),
                ),
                RouteRecord::new("maintenance/tasks", MaintenanceTasks, RouteMeta::titled("保养任务")),
                RouteRecord::new(
                    "maintenance/execute/:taskId?",
                    MaintenanceExecute,
                    RouteMeta::full_screen(),
                ),
                RouteRecord::new("spareparts", SpareParts, RouteMeta::titled("备件管理")),
                RouteRecord::new("analytics", Analytics, RouteMeta::titled("统计分析")),
                RouteRecord::new("knowledge", Knowledge, RouteMeta::titled("知识库")),
            ],
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param { name: String, optional: bool },
}

fn parse_pattern(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(param) => match param.strip_suffix('?') {
                Some(name) => Segment::Param {
                    name: name.to_string(),
                    optional: true,
                },
                None => Segment::Param {
                    name: param.to_string(),
                    optional: false,
                },
            },
            None => Segment::Static(s.to_string()),
        })
        .collect()
}

/// Flattened route with its inherited meta
#[derive(Debug, Clone)]
struct Route {
    name: Option<RouteName>,
    path: String,
    segments: Vec<Segment>,
    meta: RouteMeta,
    redirect: Option<&'static str>,
}

impl Route {
    fn matches(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut parts = parts.iter();

        for segment in &self.segments {
            match (segment, parts.next()) {
                (Segment::Static(expected), Some(part)) if expected.eq_ignore_ascii_case(part) => {}
                (Segment::Param { name, .. }, Some(part)) => {
                    let value = urlencoding::decode(part).ok()?.into_owned();
                    params.insert(name.clone(), value);
                }
                (Segment::Param { optional: true, .. }, None) => {}
                _ => return None,
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

fn flatten(records: &[RouteRecord], parent_path: &str, parent_meta: &RouteMeta, out: &mut Vec<Route>) {
    for record in records {
        let path = if record.path.starts_with('/') {
            record.path.to_string()
        } else if parent_path.ends_with('/') {
            format!("{}{}", parent_path, record.path)
        } else {
            format!("{}/{}", parent_path, record.path)
        };
        let meta = record.meta.inherit(parent_meta);

        out.push(Route {
            name: record.name,
            segments: parse_pattern(&path),
            path: path.clone(),
            meta,
            redirect: record.redirect,
        });

        flatten(&record.children, &path, &meta, out);
    }
}

/// A path matched against the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub name: Option<RouteName>,
    pub path: String,
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub meta: RouteMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Join a path and query pairs into a full path
pub fn full_path(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish();
    format!("{}?{}", path, encoded)
}

pub struct Router {
    routes: Vec<Route>,
    current: Option<ResolvedRoute>,
}

impl Router {
    pub fn new() -> Self {
        Self::from_records(&routes())
    }

    pub fn from_records(records: &[RouteRecord]) -> Self {
        let mut flat = Vec::new();
        flatten(records, "", &RouteMeta::default(), &mut flat);
        Self {
            routes: flat,
            current: None,
        }
    }

    /// Names of every named route, in table order
    pub fn route_names(&self) -> impl Iterator<Item = RouteName> + '_ {
        self.routes.iter().filter_map(|route| route.name)
    }

    /// Route the last successful navigation landed on
    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.current.as_ref()
    }

    /// Match `target` (path with optional query) and follow static redirects
    pub fn resolve(&self, target: &str) -> Result<ResolvedRoute, RouterError> {
        let mut target = target.to_string();
        let mut redirected_from = None;

        for _ in 0..=MAX_REDIRECTS {
            let (path, query) = split_target(&target);
            let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

            let (route, params) = self
                .routes
                .iter()
                .find_map(|route| route.matches(&parts).map(|params| (route, params)))
                .ok_or_else(|| RouterError::NotFound(path.clone()))?;

            if let Some(redirect) = route.redirect {
                debug!("Route {} redirects to {}", route.path, redirect);
                redirected_from.get_or_insert_with(|| full_path(&path, &query));
                target = full_path(redirect, &query);
                continue;
            }

            return Ok(ResolvedRoute {
                name: route.name,
                full_path: full_path(&path, &query),
                path,
                params,
                query,
                meta: route.meta,
                redirected_from,
            });
        }

        Err(RouterError::RedirectLoop(target))
    }

    /// Build the concrete path of a named route
    pub fn path_for(&self, name: RouteName, params: &[(&str, &str)]) -> Result<String, RouterError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name == Some(name))
            .ok_or(RouterError::UnknownRoute(name))?;

        let mut path = String::new();
        for segment in &route.segments {
            match segment {
                Segment::Static(s) => {
                    path.push('/');
                    path.push_str(s);
                }
                Segment::Param { name: param, optional } => {
                    match params.iter().find(|(k, _)| *k == param.as_str()) {
                        Some((_, value)) => {
                            path.push('/');
                            path.push_str(&urlencoding::encode(value));
                        }
                        None if *optional => {}
                        None => {
                            return Err(RouterError::MissingParam {
                                route: name,
                                param: param.clone(),
                            })
                        }
                    }
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Full path of a parameterless named route with `query` appended
    pub fn location(&self, name: RouteName, query: &[(String, String)]) -> Result<String, RouterError> {
        Ok(full_path(&self.path_for(name, &[])?, query))
    }

    /// Resolve `target`, run the guard and follow its redirects.
    ///
    /// `forced` lets an authenticated session open the login page.
    pub fn navigate(
        &mut self,
        target: &str,
        session: &SessionState,
        forced: bool,
    ) -> Result<ResolvedRoute, RouterError> {
        let mut route = self.resolve(target)?;
        let mut forced = forced;
        let origin = route
            .redirected_from
            .clone()
            .unwrap_or_else(|| route.full_path.clone());

        for _ in 0..MAX_REDIRECTS {
            match guard::guard(&route, session, forced) {
                NavigationDecision::Proceed => {
                    info!("Navigated to {}", route.full_path);
                    self.current = Some(route.clone());
                    return Ok(route);
                }
                NavigationDecision::Redirect(location) => {
                    let next = self.location(location.name, &location.query)?;
                    debug!("Guard redirected {} to {}", route.full_path, next);
                    route = self.resolve(&next)?;
                    route.redirected_from = Some(origin.clone());
                    forced = false;
                }
            }
        }

        Err(RouterError::RedirectLoop(origin))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn split_target(target: &str) -> (String, Vec<(String, String)>) {
    let target = target.split('#').next().unwrap_or_default();
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };

    let trimmed = path.trim_end_matches('/');
    let path = if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    let query = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    (path, query)
}

/// Router errors
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Unknown route {0:?}")]
    UnknownRoute(RouteName),

    #[error("Route {route:?} requires parameter '{param}'")]
    MissingParam { route: RouteName, param: String },

    #[error("Too many redirects navigating to {0}")]
    RedirectLoop(String),
}
