//! Query normalization.
//!
//! Users often type qualifiers the index keys no longer carry
//! (`discord.ext.commands.Bot`). Those are stripped before matching.

/// Members every `abc.Messageable` implementor inherits.
///
/// On unstable channels a bare query for one of these is redirected to the
/// base class entry, which is where the docs define it.
pub const MESSAGEABLE_MEMBERS: &[&str] = &[
    "fetch_message",
    "history",
    "pins",
    "send",
    "trigger_typing",
    "typing",
];

const NAMESPACE_PREFIXES: [&str; 3] = ["discord.ext.", "discord.", ""];
const GROUP_PREFIXES: [&str; 2] = ["commands.", ""];

/// Strip one leading `discord.`/`discord.ext.` and then one `commands.`.
///
/// A prefix is only removed when something is left after it, so `discord.`
/// on its own stays as typed.
pub fn normalize_term(term: &str) -> &str {
    for namespace in NAMESPACE_PREFIXES {
        let Some(rest) = term.strip_prefix(namespace) else {
            continue;
        };
        for group in GROUP_PREFIXES {
            if let Some(rest) = rest.strip_prefix(group) {
                if !rest.is_empty() {
                    return rest;
                }
            }
        }
    }
    term
}

/// Qualified key for an inherited `abc.Messageable` member, if `term` names one.
pub fn redirect_inherited(term: &str) -> Option<String> {
    let lowered = term.to_lowercase();
    MESSAGEABLE_MEMBERS
        .iter()
        .find(|member| **member == lowered)
        .map(|member| format!("abc.Messageable.{member}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_known_qualifiers() {
        assert_eq!(normalize_term("discord.ext.commands.Bot"), "Bot");
        assert_eq!(normalize_term("discord.ext.tasks.loop"), "tasks.loop");
        assert_eq!(normalize_term("discord.Client"), "Client");
        assert_eq!(normalize_term("commands.Cog"), "Cog");
        assert_eq!(normalize_term("discord.commands.Context"), "Context");
    }

    #[test]
    fn test_normalize_leaves_other_terms() {
        assert_eq!(normalize_term("asyncio.run"), "asyncio.run");
        assert_eq!(normalize_term("Discord.Client"), "Discord.Client");
        assert_eq!(normalize_term("ext.commands.Bot"), "ext.commands.Bot");
    }

    #[test]
    fn test_normalize_keeps_something_to_match() {
        assert_eq!(normalize_term("discord."), "discord.");
        assert_eq!(normalize_term("discord.ext."), "ext.");
        assert_eq!(normalize_term("commands."), "commands.");
        assert_eq!(normalize_term("discord.commands."), "commands.");
    }

    #[test]
    fn test_redirect_inherited_members() {
        assert_eq!(
            redirect_inherited("send").as_deref(),
            Some("abc.Messageable.send")
        );
        assert_eq!(
            redirect_inherited("History").as_deref(),
            Some("abc.Messageable.history")
        );
        assert_eq!(redirect_inherited("sender"), None);
        assert_eq!(redirect_inherited("Client"), None);
    }
}
