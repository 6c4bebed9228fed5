/// User-visible notification, `alert()` in the browser.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}
