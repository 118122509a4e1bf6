//! Integration tests for the theme service
//!
//! These tests verify that:
//! - Applying the same appearance twice leaves exactly one class and no extra mutations
//! - At most one system listener is attached for any sequence of calls
//! - Without a host bridge the system preference decides
//! - A later `follow_system` call wins over the host bridge

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tgui_core::ReactiveGraph;
use tgui_dom::Document;
use tgui_theme::headless::{HeadlessHostBridge, HeadlessMediaQuery};
use tgui_theme::{Appearance, ThemeEnvironment, ThemeMode, ThemeService};

fn theme_classes(document: &Document) -> Vec<String> {
    document
        .class_names(document.document_element())
        .into_iter()
        .filter(|class| class.starts_with("theme-"))
        .collect()
}

#[test]
fn apply_theme_twice_is_idempotent() {
    let document = Document::new();
    let env = ThemeEnvironment::unavailable().with_document(document.clone());
    let theme = ThemeService::new(Rc::new(ReactiveGraph::new()), env);

    theme.apply_theme_to_dom(Appearance::Dark);
    let mutations = document.mutation_count();

    assert!(!theme.apply_theme_to_dom(Appearance::Dark));
    assert_eq!(document.mutation_count(), mutations);
    assert_eq!(theme_classes(&document), vec!["theme-dark".to_string()]);
}

#[test]
fn switching_theme_leaves_no_stale_class() {
    let document = Document::new();
    let env = ThemeEnvironment::unavailable().with_document(document.clone());
    let theme = ThemeService::new(Rc::new(ReactiveGraph::new()), env);

    for next in [Appearance::Dark, Appearance::Light, Appearance::Dark] {
        theme.set_theme(next, false);
        assert_eq!(theme_classes(&document), vec![next.class_name().to_string()]);
    }
}

#[test]
fn no_host_bridge_and_dark_system_initializes_dark() {
    let document = Document::new();
    let system = Rc::new(HeadlessMediaQuery::new(true));
    let env = ThemeEnvironment::unavailable()
        .with_system(system)
        .with_document(document.clone());

    let theme = ThemeService::new(Rc::new(ReactiveGraph::new()), env);

    assert_eq!(theme.appearance(), Appearance::Dark);
    let root = document.document_element();
    assert!(document.has_class(root, "theme-dark"));
    assert!(!document.has_class(root, "theme-light"));
}

#[test]
fn system_changes_are_followed_and_observed_reactively() {
    let graph = Rc::new(ReactiveGraph::new());
    let system = Rc::new(HeadlessMediaQuery::new(false));
    let env = ThemeEnvironment::unavailable().with_system(system.clone());
    let theme = ThemeService::new(graph.clone(), env);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let appearance = theme.appearance_signal();
    let _effect = graph.create_effect(move |g| {
        seen_clone.borrow_mut().push(g.get(appearance).unwrap_or_default());
    });

    system.set_prefers_dark(true);
    system.set_prefers_dark(false);
    assert_eq!(
        *seen.borrow(),
        vec![Appearance::Light, Appearance::Dark, Appearance::Light]
    );
}

#[test]
fn follow_system_after_init_wins_over_host() {
    let host = Rc::new(HeadlessHostBridge::new(Some(Appearance::Light)));
    let system = Rc::new(HeadlessMediaQuery::new(true));
    let env = ThemeEnvironment::unavailable()
        .with_host(host.clone())
        .with_system(system.clone());
    let theme = ThemeService::new(Rc::new(ReactiveGraph::new()), env);
    assert_eq!(theme.mode(), ThemeMode::FollowingHost);

    theme.setup_theme(None, true);
    assert_eq!(theme.mode(), ThemeMode::FollowingSystem);
    assert_eq!(theme.appearance(), Appearance::Dark);
    assert_eq!(host.listener_count(), 0);
    assert_eq!(system.listener_count(), 1);

    // Host events no longer reach the service
    host.set_color_scheme(Some(Appearance::Light));
    assert_eq!(theme.appearance(), Appearance::Dark);
}

#[derive(Clone, Debug)]
enum Call {
    SetTheme(bool, bool),
    SetupTheme(Option<bool>, bool),
    Toggle,
    SystemChange(bool),
}

fn call_strategy() -> impl Strategy<Value = Call> {
    prop_oneof![
        (any::<bool>(), any::<bool>()).prop_map(|(dark, follow)| Call::SetTheme(dark, follow)),
        (proptest::option::of(any::<bool>()), any::<bool>())
            .prop_map(|(dark, follow)| Call::SetupTheme(dark, follow)),
        Just(Call::Toggle),
        any::<bool>().prop_map(Call::SystemChange),
    ]
}

proptest! {
    #[test]
    fn at_most_one_system_listener(calls in proptest::collection::vec(call_strategy(), 0..30)) {
        let document = Document::new();
        let host = Rc::new(HeadlessHostBridge::new(Some(Appearance::Light)));
        let system = Rc::new(HeadlessMediaQuery::new(false));
        let env = ThemeEnvironment::unavailable()
            .with_host(host.clone())
            .with_system(system.clone())
            .with_document(document.clone());
        let theme = ThemeService::new(Rc::new(ReactiveGraph::new()), env);

        for call in calls {
            match call {
                Call::SetTheme(dark, follow) => theme.set_theme(Appearance::from_dark(dark), follow),
                Call::SetupTheme(dark, follow) => theme.setup_theme(dark.map(Appearance::from_dark), follow),
                Call::Toggle => theme.toggle(),
                Call::SystemChange(dark) => system.set_prefers_dark(dark),
            }

            prop_assert!(system.listener_count() <= 1);
            prop_assert!(system.add_calls() - system.remove_calls() <= 1);
            prop_assert!(host.listener_count() + system.listener_count() <= 1);
            prop_assert_eq!(theme_classes(&document), vec![theme.appearance().class_name().to_string()]);
        }
    }
}
