use std::fmt;

use super::quote::ParsedQuote;

/// A session cookie as handed out by the server.
///
/// Only the `name=value` pair is kept; attributes such as `Path` or
/// `Expires` do not matter within a single request chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the value of a `Set-Cookie` header.
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value.trim()))
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Cookies of one session, in the order the server first set them.
///
/// Setting a cookie whose name is already present replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionCookies(Vec<Cookie>);

impl SessionCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_set_cookie_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut cookies = Self::new();
        for cookie in headers.into_iter().filter_map(Cookie::parse_set_cookie) {
            cookies.insert(cookie);
        }
        cookies
    }

    pub fn insert(&mut self, cookie: Cookie) {
        match self.0.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => existing.value = cookie.value,
            None => self.0.push(cookie),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cookie> {
        self.0.iter()
    }

    /// Value for a `Cookie` request header, `None` when there is nothing to send.
    pub fn header_value(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(
            self.0
                .iter()
                .map(Cookie::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

impl FromIterator<Cookie> for SessionCookies {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut cookies = Self::new();
        for cookie in iter {
            cookies.insert(cookie);
        }
        cookies
    }
}

/// Crumb plus cookies authorizing one historical request.
///
/// Can only be obtained from a parsed quote page that carried a crumb.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    crumb: String,
    cookies: SessionCookies,
}

impl SessionToken {
    /// Returns `None` unless `quote` is the Yahoo variant with a non-empty crumb.
    pub fn from_session(quote: &ParsedQuote, cookies: SessionCookies) -> Option<Self> {
        let crumb = quote.crumb()?;
        Some(Self {
            crumb: crumb.to_string(),
            cookies,
        })
    }

    pub fn crumb(&self) -> &str {
        &self.crumb
    }

    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }
}

// The crumb is a credential
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("crumb", &"<redacted>")
            .field("cookies", &self.cookies.len())
            .finish()
    }
}
