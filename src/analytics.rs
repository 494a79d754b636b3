use std::sync::Arc;

/// Observational event sink; nothing reads a result back.
pub trait Analytics: Send + Sync {
    fn event(&self, action: &str, category: &str, label: &str, value: &str);
}

/// Hands a link to whatever can show it (a browser tab, a terminal, a log).
pub trait Opener: Send + Sync {
    fn open(&self, url: &str);
}

/// Records analytics events as tracing events
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn event(&self, action: &str, category: &str, label: &str, value: &str) {
        tracing::info!(target: "folio::analytics", action, category, label, value, "event");
    }
}

pub struct LogOpener;

impl Opener for LogOpener {
    fn open(&self, url: &str) {
        tracing::info!(url, "open link");
    }
}

/// Opens outbound links, recording a click event on production deployments.
#[derive(Clone)]
pub struct LinkTracker {
    production: bool,
    analytics: Arc<dyn Analytics>,
    opener: Arc<dyn Opener>,
}

impl LinkTracker {
    pub fn new(production: bool, analytics: Arc<dyn Analytics>, opener: Arc<dyn Opener>) -> Self {
        Self {
            production,
            analytics,
            opener,
        }
    }

    pub fn click(&self, url: &str) {
        if self.production {
            self.analytics
                .event("link_click", "links", "user clicked on a link button", url);
        }
        self.opener.open(url);
    }
}

impl Default for LinkTracker {
    fn default() -> Self {
        Self::new(false, Arc::new(TracingAnalytics), Arc::new(LogOpener))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct Recorder {
        pub events: Mutex<Vec<Vec<String>>>,
        pub opened: Mutex<Vec<String>>,
    }

    impl Analytics for Recorder {
        fn event(&self, action: &str, category: &str, label: &str, value: &str) {
            self.events.lock().unwrap().push(
                [action, category, label, value]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            );
        }
    }

    impl Opener for Recorder {
        fn open(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }
    }
}
