// Session layer: a small blocking HTTP "browser" that fetches pages,
// selects forms by id and submits them, carrying cookies across requests.
// It is intentionally small and synchronous; one login plus one form
// submission does not warrant an async runtime.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderValue, LOCATION, SET_COOKIE};
use reqwest::redirect;
use reqwest::{Method, StatusCode, Url};

use crate::error::Error;
use crate::form::{page_title, FormModel};

const MAX_REDIRECTS: usize = 10;

/// State dumped for the user when the remote site does not look the way we
/// expect it to.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub current_url: Option<String>,
    pub page_title: Option<String>,
    pub cookie_names: Vec<String>,
}

/// The form-session surface the publishing logic runs against. Keeping the
/// HTTP plumbing behind this trait keeps the field-naming and retention
/// logic unit-testable without a network.
pub trait FormSession {
    fn open_page(&mut self, url: &str) -> Result<(), Error>;
    fn select_form(&mut self, id: &str) -> Result<(), Error>;
    fn field(&self, name: &str) -> Option<String>;
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error>;
    fn submit(&mut self) -> Result<(), Error>;
    fn diagnostics(&self) -> Diagnostics;
}

struct Page {
    url: Url,
    title: Option<String>,
    html: String,
}

/// HTTP-backed [`FormSession`] holding a reqwest blocking client with a
/// cookie store, the page currently "open" and the form currently selected.
///
/// Redirects are followed manually so that `Set-Cookie` headers on
/// intermediate responses (the login redirect sets the session cookie this
/// way) show up in diagnostics.
pub struct Browser {
    client: Client,
    page: Option<Page>,
    form: Option<FormModel>,
    cookie_names: Vec<String>,
}

impl Browser {
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Browser {
            client,
            page: None,
            form: None,
            cookie_names: Vec::new(),
        })
    }

    fn fetch(
        &mut self,
        mut method: Method,
        mut url: Url,
        form_data: Option<&[(String, String)]>,
    ) -> Result<Response, Error> {
        let mut body = form_data.map(|pairs| pairs.to_vec());
        for _ in 0..MAX_REDIRECTS {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(pairs) = &body {
                request = if method == Method::POST {
                    request.form(pairs)
                } else {
                    request.query(pairs)
                };
            }
            let response = request.send()?;
            self.record_cookies(&response);

            if !response.status().is_redirection() {
                return Ok(response);
            }
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| Error::BadUrl("redirect without a Location header".into()))?;
            url = url
                .join(location)
                .map_err(|err| Error::BadUrl(format!("{location}: {err}")))?;
            // 307/308 keep the method and body, everything else degrades
            // to a plain GET like browsers do.
            if response.status() != StatusCode::TEMPORARY_REDIRECT
                && response.status() != StatusCode::PERMANENT_REDIRECT
            {
                method = Method::GET;
                body = None;
            }
        }
        Err(Error::TooManyRedirects(url.into()))
    }

    fn record_cookies(&mut self, response: &Response) {
        for value in response.headers().get_all(SET_COOKIE) {
            if let Some(name) = set_cookie_name(value) {
                if !self.cookie_names.contains(&name) {
                    self.cookie_names.push(name);
                }
            }
        }
    }

    fn finish_navigation(&mut self, response: Response) -> Result<(), Error> {
        let url = response.url().clone();
        let html = response.text()?;
        tracing::debug!(url = %url, bytes = html.len(), "page loaded");
        self.page = Some(Page {
            title: page_title(&html),
            url,
            html,
        });
        self.form = None;
        Ok(())
    }
}

impl FormSession for Browser {
    fn open_page(&mut self, url: &str) -> Result<(), Error> {
        let url = Url::parse(url).map_err(|err| Error::BadUrl(format!("{url}: {err}")))?;
        let response = self.fetch(Method::GET, url, None)?;
        self.finish_navigation(response)
    }

    fn select_form(&mut self, id: &str) -> Result<(), Error> {
        let page = self.page.as_ref().ok_or(Error::NoPageOpen)?;
        match FormModel::from_document(&page.html, id) {
            Some(form) => {
                self.form = Some(form);
                Ok(())
            }
            None => Err(Error::FormNotFound {
                id: id.to_string(),
                url: page.url.to_string(),
            }),
        }
    }

    fn field(&self, name: &str) -> Option<String> {
        self.form
            .as_ref()
            .and_then(|f| f.value_of(name))
            .map(str::to_string)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.form
            .as_mut()
            .ok_or(Error::NoFormSelected)?
            .set(name, value)
    }

    fn submit(&mut self) -> Result<(), Error> {
        let form = self.form.take().ok_or(Error::NoFormSelected)?;
        let page = self.page.as_ref().ok_or(Error::NoPageOpen)?;
        let action = resolve_action(&page.url, form.action.as_deref())?;
        let method = if form.method == "post" {
            Method::POST
        } else {
            Method::GET
        };
        let pairs = form.encode();
        tracing::debug!(action = %action, fields = pairs.len(), "submitting form");
        let response = self.fetch(method, action, Some(&pairs))?;
        self.finish_navigation(response)
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            current_url: self.page.as_ref().map(|p| p.url.to_string()),
            page_title: self.page.as_ref().and_then(|p| p.title.clone()),
            cookie_names: self.cookie_names.clone(),
        }
    }
}

/// A form with no (or an empty) action submits back to the current page.
fn resolve_action(page_url: &Url, action: Option<&str>) -> Result<Url, Error> {
    match action {
        None | Some("") => Ok(page_url.clone()),
        Some(action) => page_url
            .join(action)
            .map_err(|err| Error::BadUrl(format!("{action}: {err}"))),
    }
}

fn set_cookie_name(value: &HeaderValue) -> Option<String> {
    let text = value.to_str().ok()?;
    let name = text.split(';').next()?.split('=').next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_resolves_against_the_page_url() {
        let page = Url::parse("https://foundryvtt.com/packages/123/edit").unwrap();
        assert_eq!(
            resolve_action(&page, Some("/auth/login/")).unwrap().as_str(),
            "https://foundryvtt.com/auth/login/"
        );
        assert_eq!(
            resolve_action(&page, Some("edit")).unwrap().as_str(),
            "https://foundryvtt.com/packages/123/edit"
        );
        assert_eq!(resolve_action(&page, None).unwrap(), page);
        assert_eq!(resolve_action(&page, Some("")).unwrap(), page);
    }

    #[test]
    fn cookie_names_are_parsed_from_set_cookie_headers() {
        let value = HeaderValue::from_static("sessionid=abc123; Path=/; HttpOnly");
        assert_eq!(set_cookie_name(&value).as_deref(), Some("sessionid"));

        let value = HeaderValue::from_static("csrftoken=tok");
        assert_eq!(set_cookie_name(&value).as_deref(), Some("csrftoken"));

        let value = HeaderValue::from_static("");
        assert_eq!(set_cookie_name(&value), None);
    }

    #[test]
    fn selecting_a_form_without_a_page_fails() {
        let mut browser = Browser::new().unwrap();
        assert!(matches!(
            browser.select_form("package-form"),
            Err(Error::NoPageOpen)
        ));
    }
}
