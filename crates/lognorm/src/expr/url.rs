use std::fmt;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlComponent {
    /// Registered domain (last two host labels).
    Domain,
    /// Extension of the last path segment, including the dot.
    Ext,
    Fqdn,
    /// Last path segment.
    Page,
    Path,
    /// Explicit port, or the scheme's default.
    Port,
    Query,
    /// Scheme and authority with an empty path.
    Root,
}

impl UrlComponent {
    pub const ALL: [UrlComponent; 8] = [
        UrlComponent::Domain,
        UrlComponent::Ext,
        UrlComponent::Fqdn,
        UrlComponent::Page,
        UrlComponent::Path,
        UrlComponent::Port,
        UrlComponent::Query,
        UrlComponent::Root,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlComponent::Domain => "domain",
            UrlComponent::Ext => "ext",
            UrlComponent::Fqdn => "fqdn",
            UrlComponent::Page => "page",
            UrlComponent::Path => "path",
            UrlComponent::Port => "port",
            UrlComponent::Query => "query",
            UrlComponent::Root => "root",
        }
    }
}

impl fmt::Display for UrlComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UrlExtractError {
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("No default port known for scheme '{0}'")]
    NoDefaultPort(String),
}

/// Extract one component from a URL-ish string.
///
/// A bare host such as `www.example.com` is read as `http://www.example.com`
/// but without a default port. The empty string yields an empty component.
pub fn extract(component: UrlComponent, input: &str) -> Result<String, UrlExtractError> {
    if input.is_empty() {
        return Ok(String::new());
    }

    let (url, bare_host) = match Url::parse(input) {
        Ok(url) => (url, false),
        Err(url::ParseError::RelativeUrlWithoutBase) => (Url::parse(&format!("http://{}", input))?, true),
        Err(e) => return Err(e.into()),
    };

    let path = if bare_host && url.path() == "/" {
        ""
    } else {
        url.path()
    };
    let page = path.rsplit('/').next().unwrap_or("");

    let result = match component {
        UrlComponent::Domain => registered_domain(url.host_str().unwrap_or("")),
        UrlComponent::Ext => page.rfind('.').map(|i| page[i..].to_string()).unwrap_or_default(),
        UrlComponent::Fqdn => url.host_str().unwrap_or("").to_string(),
        UrlComponent::Page => page.to_string(),
        UrlComponent::Path => path.to_string(),
        UrlComponent::Port => {
            if bare_host {
                url.port().map(|p| p.to_string()).unwrap_or_default()
            } else {
                url.port_or_known_default()
                    .map(|p| p.to_string())
                    .ok_or_else(|| UrlExtractError::NoDefaultPort(url.scheme().to_string()))?
            }
        }
        UrlComponent::Query => url.query().unwrap_or("").to_string(),
        UrlComponent::Root => {
            let mut root = url.clone();
            root.set_path("/");
            root.set_query(None);
            root.set_fragment(None);
            root.to_string()
        }
    };
    Ok(result)
}

fn registered_domain(host: &str) -> String {
    if host.parse::<std::net::IpAddr>().is_ok() || host.starts_with('[') {
        return host.to_string();
    }
    let labels: Vec<&str> = host.trim_end_matches('.').rsplitn(3, '.').collect();
    match labels.as_slice() {
        [tld, domain, ..] => format!("{}.{}", domain, tld),
        _ => host.to_string(),
    }
}
