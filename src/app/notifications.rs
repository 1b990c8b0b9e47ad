use notify_rust::Notification;

const APP_NAME: &str = "ESC/POS Print Panel";

#[derive(Debug, PartialEq, Eq)]
struct Toast {
    summary: &'static str,
    body: String,
    timeout_ms: i32,
}

fn toast(job: &str, error: Option<&str>) -> Toast {
    match error {
        None => Toast {
            summary: "Print Completed",
            body: format!("{} printed successfully", job),
            timeout_ms: 3000,
        },
        Some(error) => Toast {
            summary: "Print Failed",
            body: format!("{}: {}", job, error),
            timeout_ms: 5000,
        },
    }
}

fn show(toast: Toast) {
    if let Err(e) = Notification::new()
        .appname(APP_NAME)
        .summary(toast.summary)
        .body(&toast.body)
        .timeout(toast.timeout_ms)
        .show()
    {
        log::debug!("Desktop notification not shown: {}", e);
    }
}

/// Desktop toast for a finished job; `error` is set when it failed.
/// `show` blocks on the desktop bus, so it runs on the blocking pool.
pub fn notify_job(job: &str, error: Option<&str>) {
    let toast = toast(job, error);
    tokio::task::spawn_blocking(move || show(toast));
}
