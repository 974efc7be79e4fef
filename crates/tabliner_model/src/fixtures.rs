use crate::model::Tab;

/// One window holding two tabs; the first is active.
pub(crate) fn chrome_tabs() -> Vec<Tab> {
    vec![
        Tab::new(1, 1, 0)
            .with_title("Google")
            .with_url("https://google.com")
            .with_active(true),
        Tab::new(2, 1, 1)
            .with_title("Yahoo")
            .with_url("https://yahoo.com"),
    ]
}

/// Window 1 holds tabs 10 and 11, window 2 holds tabs 12 and 13.
pub(crate) fn two_windows_two_tabs_each() -> Vec<Tab> {
    vec![
        Tab::new(10, 1, 0)
            .with_title("Rust")
            .with_url("https://www.rust-lang.org")
            .with_active(true),
        Tab::new(11, 1, 1)
            .with_title("Crates")
            .with_url("https://crates.io"),
        Tab::new(12, 2, 0)
            .with_title("Docs")
            .with_url("https://docs.rs")
            .with_active(true),
        Tab::new(13, 2, 1)
            .with_title("Blog")
            .with_url("https://blog.rust-lang.org"),
    ]
}
