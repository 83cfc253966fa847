use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub(crate) static ref URL: Regex =
        Regex::new(r"http\S+|www\S+|https\S+|<url>").expect("url pattern is valid");
    pub(crate) static ref EMAIL: Regex = Regex::new(r"\S+@\S+").expect("email pattern is valid");
    pub(crate) static ref PHONE: Regex = Regex::new(r"\b\d{10,11}\b").expect("phone pattern is valid");
    pub(crate) static ref HTML_TAG: Regex = Regex::new(r"<.*?>").expect("html pattern is valid");
    pub(crate) static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
    pub(crate) static ref DOTS: Regex = Regex::new(r"\.{2,}").expect("dots pattern is valid");
    pub(crate) static ref BANGS: Regex = Regex::new(r"!{2,}").expect("bangs pattern is valid");
    pub(crate) static ref QUESTIONS: Regex = Regex::new(r"\?{2,}").expect("questions pattern is valid");
}

/// Collapses whitespace runs to a single space and trims both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_pattern() {
        assert_eq!(URL.replace_all("xem http://x.com/a?b=1 nhé", ""), "xem  nhé");
        assert_eq!(URL.replace_all("www.vnexpress.net tin", ""), " tin");
        assert_eq!(URL.replace_all("link <url> đây", ""), "link  đây");
        // a bare "http" has nothing after it to consume
        assert_eq!(URL.replace_all("http", ""), "http");
    }

    #[test]
    fn test_email_and_phone_patterns() {
        assert_eq!(EMAIL.replace_all("gửi a.b@mail.com ngay", ""), "gửi  ngay");
        assert_eq!(PHONE.replace_all("gọi 0912345678 hoặc 01234567890", ""), "gọi  hoặc ");
        assert_eq!(PHONE.replace_all("mã 123456789", ""), "mã 123456789");
        assert_eq!(PHONE.replace_all("số 012345678901", ""), "số 012345678901");
    }

    #[test]
    fn test_html_pattern_is_lazy() {
        assert_eq!(HTML_TAG.replace_all("<p>xin <b>chào</b></p>", ""), "xin chào");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t\n b  "), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
