use crate::types::notification::NotificationOptions;

use std::fmt::Display;

pub trait NotificationSurface: Clone + 'static {
    type Error: Display + 'static;
    type Show<'a>: Future<Output = Result<(), Self::Error>> + 'a
    where
        Self: 'a;

    fn show<'a>(&'a self, title: &'a str, options: &'a NotificationOptions) -> Self::Show<'a>;
}

/// The worker's view of open application windows.
pub trait WindowClients: Clone + 'static {
    type Client: WindowClient;
    type Error: Display + 'static;
    type Match<'a>: Future<Output = Result<Vec<Self::Client>, Self::Error>> + 'a
    where
        Self: 'a;
    type Open<'a>: Future<Output = Result<(), Self::Error>> + 'a
    where
        Self: 'a;

    /// All window clients, including ones this worker does not control.
    fn windows(&self) -> Self::Match<'_>;
    fn can_open_windows(&self) -> bool;
    fn open_window<'a>(&'a self, url: &'a str) -> Self::Open<'a>;
}

pub trait WindowClient: 'static {
    type Error: Display + 'static;
    type Focus<'a>: Future<Output = Result<(), Self::Error>> + 'a
    where
        Self: 'a;

    fn url(&self) -> String;
    fn can_focus(&self) -> bool;
    fn focus(&self) -> Self::Focus<'_>;
}

/// The notification a click event refers to.
pub trait ActivatedNotification {
    fn close(&self);
}
