//! Human-readable titles and explanations for findings.
//!
//! Plain prose only. Markup, embeds and whatever else the chat platform
//! wants are the notifier's problem, so the engine stays portable.

use crate::config::DocLinks;
use crate::detect::FindingKind;

/// Title and explanation for a finding kind, with doc links substituted.
pub fn explain(kind: FindingKind, links: &DocLinks) -> (String, String) {
    let (title, body) = match kind {
        FindingKind::EventDecoratorCalled => (
            "Events don't use brackets".to_string(),
            "When registering an event handler the decorator is used bare: \
             `@bot.event`, not `@bot.event()`. Calling it registers nothing \
             and the handler never runs. The suggested fix below removes the \
             brackets."
                .to_string(),
        ),
        FindingKind::ListenerDecoratorNotCalled => (
            "Listeners must be called".to_string(),
            "Unlike `event`, the `listen` decorator takes arguments and has \
             to be invoked: `@bot.listen()`. Used bare it replaces your \
             handler with the decorator machinery and the listener is never \
             registered."
                .to_string(),
        ),
        FindingKind::ClientVariableNamedIncorrectly => (
            "Calling your Bot \"client\" is not recommended".to_string(),
            "Binding a `Bot` instance to a variable named `client` suggests \
             it is a bare `Client`, which misleads both you and anyone \
             reading your code about what the object can do. Consider \
             naming it `bot`. More detail: \
             https://tutorial.vcokltfre.dev/tips/clientbot/"
                .to_string(),
        ),
        FindingKind::MessageHookMissingDispatchCall => (
            "Overriding on_message without processing commands".to_string(),
            format!(
                "Overriding the `on_message` event replaces the default \
                 handler that dispatches prefix commands, so none of your \
                 commands will run until the handler forwards the message \
                 with `process_commands`. The suggested fix appends that \
                 call. More detail: {}",
                links.on_message_dispatch
            ),
        ),
        FindingKind::SelfParamOnFreeFunctionCommand => (
            "Commands outside a cog don't take self".to_string(),
            "This command is defined at module level but takes `self` as \
             its first parameter. `self` only applies to commands defined \
             inside a cog; here the library would bind the invocation \
             context to it and your real parameters would shift by one. The \
             suggested fix removes it."
                .to_string(),
        ),
        FindingKind::SelfParamMissingOnMethodCommand => (
            "Missing self parameter".to_string(),
            "This command or listener is defined inside a class (a cog) but \
             does not take `self` as its first parameter, so the instance \
             would be bound to whatever parameter comes first. The \
             suggested fix adds it."
                .to_string(),
        ),
        FindingKind::WrongContextTypeAnnotation => (
            "Prefix commands receive a Context".to_string(),
            format!(
                "This prefix command annotates its first parameter as an \
                 interaction, but prefix commands are invoked with a \
                 `Context`. The annotation does not change what gets passed, \
                 it only misleads you and your editor. More detail: {}",
                links.context
            ),
        ),
        FindingKind::WrongInteractionTypeAnnotation => (
            "Application commands receive an Interaction".to_string(),
            format!(
                "This slash/user/message command annotates its first \
                 parameter as a `Context`, but application commands are \
                 invoked with an `Interaction`, which has a different API. \
                 More detail: {}",
                links.interaction
            ),
        ),
        FindingKind::DeprecatedLegacyFeatureUsed => (
            "This code was written for a very old library version".to_string(),
            "Features like `pass_context` and `fetch_offline_members` were \
             removed in the 1.0 rewrite years ago. The snippet (or the \
             tutorial it came from) targets a library version that no \
             longer exists; follow the current documentation's migration \
             guide rather than patching it piecemeal."
                .to_string(),
        ),
    };
    (title, body)
}
