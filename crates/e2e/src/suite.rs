//! The built-in auth suite
//!
//! Seven ordered scenarios covering registration, login, session
//! gating, and logout against the target application. Order is
//! significant: the duplicate-registration scenario is only meaningful
//! once the run identity exists, and login scenarios consume the same
//! identity. Scenarios that depend on the account declare
//! `requires_registered` so the runner can establish the precondition
//! explicitly rather than trusting an earlier scenario's side effect.
//!
//! Registered accounts are never cleaned up; the target exposes no
//! deletion endpoint, which is why usernames are unique per run.

use crate::scenario::{Locator, Scenario, Step};

/// Registration form route
pub const REGISTER_PATH: &str = "/register";

/// Login form route
pub const LOGIN_PATH: &str = "/login";

/// Session-gated route
pub const SECURE_PATH: &str = "/secure";

pub(crate) fn username_field() -> Locator {
    Locator::Id("username".to_string())
}

pub(crate) fn password_field() -> Locator {
    Locator::Id("password".to_string())
}

pub(crate) fn confirm_password_field() -> Locator {
    Locator::Id("confirmPassword".to_string())
}

pub(crate) fn submit_button() -> Locator {
    Locator::Css("button[type='submit']".to_string())
}

pub(crate) fn logout_link() -> Locator {
    Locator::LinkText("Logout".to_string())
}

fn fill(locator: Locator, value: &str) -> Step {
    Step::Fill {
        locator,
        value: value.to_string(),
    }
}

fn registration_steps() -> Vec<Step> {
    vec![
        Step::Navigate {
            path: REGISTER_PATH.to_string(),
        },
        fill(username_field(), "{username}"),
        fill(password_field(), "{password}"),
        fill(confirm_password_field(), "{password}"),
        Step::Click {
            locator: submit_button(),
        },
    ]
}

fn login_steps(password_value: &str) -> Vec<Step> {
    vec![
        Step::Navigate {
            path: LOGIN_PATH.to_string(),
        },
        fill(username_field(), "{username}"),
        fill(password_field(), password_value),
        Step::Click {
            locator: submit_button(),
        },
    ]
}

/// Build the fixed scenario table, in execution order.
pub fn builtin_suite() -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    let mut steps = registration_steps();
    steps.push(Step::AssertUrlContains {
        value: LOGIN_PATH.to_string(),
    });
    scenarios.push(Scenario {
        name: "register-valid".to_string(),
        description: "Registering a fresh identity redirects to the login page".to_string(),
        order: 1,
        tags: vec!["registration".to_string(), "smoke".to_string()],
        requires_registered: false,
        steps,
    });

    scenarios.push(Scenario {
        name: "register-blank".to_string(),
        description: "Submitting the registration form empty stays on the form".to_string(),
        order: 2,
        tags: vec!["registration".to_string()],
        requires_registered: false,
        steps: vec![
            Step::Navigate {
                path: REGISTER_PATH.to_string(),
            },
            Step::Click {
                locator: submit_button(),
            },
            Step::AssertUrlEndsWith {
                value: REGISTER_PATH.to_string(),
            },
        ],
    });

    let mut steps = registration_steps();
    steps.push(Step::AssertUrlEndsWith {
        value: REGISTER_PATH.to_string(),
    });
    scenarios.push(Scenario {
        name: "register-duplicate".to_string(),
        description: "Re-registering an existing username is rejected".to_string(),
        order: 3,
        tags: vec!["registration".to_string()],
        requires_registered: true,
        steps,
    });

    let mut steps = login_steps("{password}");
    steps.push(Step::AssertUrlContains {
        value: SECURE_PATH.to_string(),
    });
    steps.push(Step::AssertSourceContains {
        value: "{username}".to_string(),
    });
    scenarios.push(Scenario {
        name: "login-valid".to_string(),
        description: "Valid credentials land on the secured page with the username rendered"
            .to_string(),
        order: 4,
        tags: vec!["login".to_string(), "smoke".to_string()],
        requires_registered: true,
        steps,
    });

    let mut steps = login_steps("wrongpass");
    steps.push(Step::AssertUrlEndsWith {
        value: LOGIN_PATH.to_string(),
    });
    steps.push(Step::AssertSourceContains {
        value: "Invalid".to_string(),
    });
    scenarios.push(Scenario {
        name: "login-wrong-password".to_string(),
        description: "A wrong password stays on the login page with an invalid-credentials message"
            .to_string(),
        order: 5,
        tags: vec!["login".to_string()],
        requires_registered: true,
        steps,
    });

    scenarios.push(Scenario {
        name: "secure-unauthenticated".to_string(),
        description: "The secured page redirects to login without a session".to_string(),
        order: 6,
        tags: vec!["session".to_string()],
        requires_registered: false,
        steps: vec![
            Step::Navigate {
                path: SECURE_PATH.to_string(),
            },
            Step::AssertUrlEndsWith {
                value: LOGIN_PATH.to_string(),
            },
        ],
    });

    let mut steps = login_steps("{password}");
    steps.push(Step::AssertUrlContains {
        value: SECURE_PATH.to_string(),
    });
    steps.push(Step::Click {
        locator: logout_link(),
    });
    steps.push(Step::Navigate {
        path: SECURE_PATH.to_string(),
    });
    steps.push(Step::AssertUrlEndsWith {
        value: LOGIN_PATH.to_string(),
    });
    scenarios.push(Scenario {
        name: "logout-clears-session".to_string(),
        description: "After logout the secured page redirects to login again".to_string(),
        order: 7,
        tags: vec!["session".to_string(), "smoke".to_string()],
        requires_registered: true,
        steps,
    });

    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Step;

    #[test]
    fn suite_has_seven_scenarios_in_ascending_order() {
        let suite = builtin_suite();
        assert_eq!(suite.len(), 7);

        let orders: Vec<u32> = suite.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn scenario_names_are_unique() {
        let suite = builtin_suite();
        let mut names: Vec<&str> = suite.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), suite.len());
    }

    #[test]
    fn dependent_scenarios_declare_registration() {
        let suite = builtin_suite();
        let required: Vec<u32> = suite
            .iter()
            .filter(|s| s.requires_registered)
            .map(|s| s.order)
            .collect();
        assert_eq!(required, vec![3, 4, 5, 7]);
    }

    #[test]
    fn valid_registration_expects_login_redirect() {
        let suite = builtin_suite();
        let register = &suite[0];
        assert_eq!(register.name, "register-valid");
        assert_eq!(
            register.steps.last(),
            Some(&Step::AssertUrlContains {
                value: LOGIN_PATH.to_string()
            })
        );
    }

    #[test]
    fn valid_login_asserts_username_in_page() {
        let suite = builtin_suite();
        let login = suite.iter().find(|s| s.name == "login-valid").unwrap();
        assert!(login.steps.contains(&Step::AssertSourceContains {
            value: "{username}".to_string()
        }));
    }

    #[test]
    fn every_scenario_ends_with_an_assertion() {
        for scenario in builtin_suite() {
            match scenario.steps.last() {
                Some(Step::AssertUrlContains { .. })
                | Some(Step::AssertUrlEndsWith { .. })
                | Some(Step::AssertSourceContains { .. }) => {}
                other => panic!(
                    "scenario {} ends with a non-assertion step: {:?}",
                    scenario.name, other
                ),
            }
        }
    }
}
