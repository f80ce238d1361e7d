//! The default preference tree
//!
//! Used whenever a user has no tree of their own: not signed in, no account
//! record, a record without the tree field, or a record that cannot be read.
//! Also written into new account records and into records being repaired.

use crate::node::PreferenceNode;
use crate::tree::PreferenceTree;

fn leaf(value: bool) -> PreferenceNode {
    PreferenceNode::leaf(value)
}

fn group<const N: usize>(entries: [(&str, PreferenceNode); N]) -> PreferenceNode {
    PreferenceNode::group(entries)
}

impl PreferenceTree {
    /// The fixed fallback tree
    pub fn default_tree() -> Self {
        let settings = group([
            (
                "notifications",
                group([
                    ("email", leaf(true)),
                    ("sms", leaf(false)),
                    ("push", group([("android", leaf(true)), ("ios", leaf(false))])),
                ]),
            ),
            (
                "privacy",
                group([
                    ("location", leaf(false)),
                    ("camera", leaf(true)),
                    ("microphone", leaf(false)),
                ]),
            ),
            (
                "security",
                group([("twoFactorAuth", leaf(true)), ("backupCodes", leaf(true))]),
            ),
        ]);

        let preferences = group([
            (
                "theme",
                group([("darkMode", leaf(false)), ("highContrast", leaf(false))]),
            ),
            (
                "language",
                group([
                    ("english", leaf(true)),
                    ("spanish", leaf(false)),
                    (
                        "nested",
                        group([(
                            "regionalDialects",
                            group([("catalan", leaf(false)), ("quechua", leaf(false))]),
                        )]),
                    ),
                ]),
            ),
        ]);

        let integrations = group([
            ("slack", leaf(true)),
            (
                "github",
                group([("issues", leaf(true)), ("pullRequests", leaf(true))]),
            ),
            (
                "jira",
                group([
                    ("basic", leaf(false)),
                    (
                        "advanced",
                        group([("workflows", leaf(false)), ("automations", leaf(false))]),
                    ),
                ]),
            ),
        ]);

        PreferenceTree::from_children(
            [
                ("settings".to_string(), settings),
                ("preferences".to_string(), preferences),
                ("integrations".to_string(), integrations),
            ]
            .into_iter()
            .collect(),
        )
    }
}
