//! Navigation guard
//!
//! Decides whether a navigation may proceed given the session. Checks run in
//! order: authentication, login page bounce, role restriction.

use serde::Serialize;

use crate::auth::SessionState;
use crate::router::{ResolvedRoute, RouteName};

/// Query key carrying the originally requested path to the login page
pub const REDIRECT_QUERY: &str = "redirect";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteLocation {
    pub name: RouteName,
    pub query: Vec<(String, String)>,
}

impl RouteLocation {
    pub fn named(name: RouteName) -> Self {
        Self {
            name,
            query: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(RouteLocation),
}

pub fn guard(to: &ResolvedRoute, session: &SessionState, forced: bool) -> NavigationDecision {
    if to.meta.requires_auth() && !session.logged_in {
        return NavigationDecision::Redirect(RouteLocation {
            name: RouteName::Login,
            query: vec![(REDIRECT_QUERY.to_string(), to.full_path.clone())],
        });
    }

    if to.name == Some(RouteName::Login) && session.logged_in && !forced {
        return NavigationDecision::Redirect(RouteLocation::named(RouteName::Dashboard));
    }

    let roles = to.meta.roles();
    if !roles.is_empty() && !session.has_role(roles) {
        return NavigationDecision::Redirect(RouteLocation::named(RouteName::Dashboard));
    }

    NavigationDecision::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::router::Router;

    fn route(path: &str) -> ResolvedRoute {
        Router::new().resolve(path).expect("route")
    }

    fn redirect_target(decision: NavigationDecision) -> RouteLocation {
        match decision {
            NavigationDecision::Redirect(location) => location,
            NavigationDecision::Proceed => panic!("expected a redirect"),
        }
    }

    #[test]
    fn anonymous_users_are_sent_to_login_with_return_path() {
        let to = route("/equipment/detail/7?tab=logs");
        let location = redirect_target(guard(&to, &SessionState::anonymous(), false));

        assert_eq!(location.name, RouteName::Login);
        assert_eq!(
            location.query,
            vec![("redirect".to_string(), "/equipment/detail/7?tab=logs".to_string())]
        );
    }

    #[test]
    fn every_auth_route_sends_anonymous_users_to_login() {
        let router = Router::new();
        let params = [("id", "11"), ("taskId", "12"), ("orderId", "13")];
        let mut guarded = 0;

        for name in router.route_names() {
            let path = router.path_for(name, &params).expect("path");
            let to = router.resolve(&format!("{path}?from=table")).expect("resolve");
            let decision = guard(&to, &SessionState::anonymous(), false);

            if to.meta.requires_auth() {
                guarded += 1;
                let location = redirect_target(decision);
                assert_eq!(location.name, RouteName::Login, "{path}");
                assert_eq!(
                    location.query,
                    vec![(REDIRECT_QUERY.to_string(), to.full_path.clone())],
                    "{path}"
                );
            } else {
                assert_eq!(decision, NavigationDecision::Proceed, "{path}");
            }
        }

        assert_eq!(guarded, router.route_names().count() - 1);
    }

    #[test]
    fn anonymous_users_may_open_login() {
        let to = route("/login");
        assert_eq!(guard(&to, &SessionState::anonymous(), false), NavigationDecision::Proceed);
    }

    #[test]
    fn logged_in_users_bounce_off_login_unless_forced() {
        let to = route("/login");
        let session = SessionState::authenticated(Role::Operator);

        let location = redirect_target(guard(&to, &session, false));
        assert_eq!(location, RouteLocation::named(RouteName::Dashboard));

        assert_eq!(guard(&to, &session, true), NavigationDecision::Proceed);
    }

    #[test]
    fn role_restricted_routes_check_membership() {
        let plans = route("/maintenance/plans");

        for role in [Role::Admin, Role::Engineer] {
            let session = SessionState::authenticated(role);
            assert_eq!(guard(&plans, &session, false), NavigationDecision::Proceed, "{role}");
        }
        for role in [Role::Supervisor, Role::Maintenance, Role::Operator] {
            let session = SessionState::authenticated(role);
            let location = redirect_target(guard(&plans, &session, false));
            assert_eq!(location.name, RouteName::Dashboard, "{role}");
        }
    }

    #[test]
    fn role_lists_are_membership_not_rank() {
        // supervisor outranks engineer but is not listed
        let org = route("/organization");
        let session = SessionState::authenticated(Role::Supervisor);
        assert!(matches!(guard(&org, &session, false), NavigationDecision::Redirect(_)));
    }

    #[test]
    fn logged_in_without_role_cannot_enter_restricted_routes() {
        let session = SessionState {
            logged_in: true,
            role: None,
        };
        assert!(matches!(
            guard(&route("/inspection/templates"), &session, false),
            NavigationDecision::Redirect(_)
        ));
        assert_eq!(guard(&route("/dashboard"), &session, false), NavigationDecision::Proceed);
    }

    #[test]
    fn unrestricted_authenticated_routes_proceed_for_every_role() {
        let paths = ["/dashboard", "/equipment", "/repair/create", "/spareparts", "/analytics"];
        for role in Role::ALL {
            let session = SessionState::authenticated(role);
            for path in paths {
                assert_eq!(guard(&route(path), &session, false), NavigationDecision::Proceed);
            }
        }
    }

    #[test]
    fn navigate_follows_guard_redirects() {
        let mut router = Router::new();

        let landed = router
            .navigate("/knowledge", &SessionState::anonymous(), false)
            .expect("navigate");
        assert_eq!(landed.name, Some(RouteName::Login));
        assert_eq!(landed.query_value(REDIRECT_QUERY), Some("/knowledge"));
        assert_eq!(landed.redirected_from.as_deref(), Some("/knowledge"));

        let operator = SessionState::authenticated(Role::Operator);
        let landed = router.navigate("/organization", &operator, false).expect("navigate");
        assert_eq!(landed.name, Some(RouteName::Dashboard));

        let landed = router.navigate("/login", &operator, true).expect("navigate");
        assert_eq!(landed.name, Some(RouteName::Login));
    }

    #[test]
    fn root_redirect_is_guarded_too() {
        let mut router = Router::new();
        let landed = router
            .navigate("/", &SessionState::anonymous(), false)
            .expect("navigate");
        assert_eq!(landed.name, Some(RouteName::Login));
        assert_eq!(landed.query_value(REDIRECT_QUERY), Some("/dashboard"));
    }
}
