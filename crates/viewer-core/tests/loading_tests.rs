use viewer_core::*;

#[test]
fn progress_labels_are_whole_percentages() {
    assert_eq!(progress_label(0.0), "0%");
    assert_eq!(progress_label(0.3), "30%");
    assert_eq!(progress_label(0.804), "80%");
    assert_eq!(progress_label(1.0), "100%");
    assert_eq!(progress_label(1.7), "100%");
    assert_eq!(progress_label(f32::NAN), "0%");
}

#[test]
fn load_state_settles_once() {
    let mut state: LoadState<u8> = LoadState::default();
    assert!(state.is_pending());
    assert!(state.report_progress(0.4));
    assert_eq!(state.progress(), 0.4);
    assert!(state.resolve(7));
    assert!(!state.resolve(8));
    assert!(!state.fail(LoadError::Cancelled));
    assert!(!state.report_progress(0.9));
    assert_eq!(state.ready(), Some(&7));
    assert_eq!(state.progress(), 1.0);
}

#[test]
fn failed_load_stays_failed() {
    let mut state: LoadState<u8> = LoadState::default();
    assert!(state.fail(LoadError::Renderer("boom".into())));
    assert!(state.is_failed());
    assert!(!state.resolve(1));
    assert!(state.ready().is_none());
}

#[test]
fn cancel_is_shared_between_clones() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(token.same_load(&clone));
    assert!(!token.same_load(&CancelToken::new()));
    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn data_url_resolution() {
    let origin = "https://viewer.example.com/";
    let cases = [
        ("/data/site.lcc", "https://viewer.example.com/data/site.lcc"),
        ("data/site.lcc", "https://viewer.example.com/data/site.lcc"),
        ("./site.lcc", "https://viewer.example.com/site.lcc"),
        ("//cdn.example.com/a.lcc", "https://cdn.example.com/a.lcc"),
        ("https://other.example.com/b.lcc", "https://other.example.com/b.lcc"),
        ("blob:abc", "blob:abc"),
    ];
    for (input, expected) in cases {
        assert_eq!(resolve_data_url(input, origin).as_deref(), Ok(expected), "{input}");
    }
}

#[test]
fn data_url_errors() {
    assert_eq!(
        resolve_data_url("  ", "https://a.example"),
        Err(ViewerError::EmptyDataUrl)
    );
    assert!(matches!(
        resolve_data_url("/x.lcc", "null"),
        Err(ViewerError::InvalidOrigin(_))
    ));
}

#[test]
fn data_url_follows_relative_reference_rules() {
    let origin = "https://h.example";
    assert_eq!(
        resolve_data_url("../scene/data.json", origin).as_deref(),
        Ok("https://h.example/scene/data.json")
    );
    assert_eq!(
        resolve_data_url("scene/my data.json", origin).as_deref(),
        Ok("https://h.example/scene/my%20data.json")
    );
    assert_eq!(
        resolve_data_url("scene/data.json?v=2#top", origin).as_deref(),
        Ok("https://h.example/scene/data.json?v=2#top")
    );
}
