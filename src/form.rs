//! A loosely-typed model of an HTML form, parsed out of a fetched page.
//!
//! The administration site's forms are an external contract we do not
//! control, so the model stays deliberately dumb: an ordered list of named
//! controls with browser-like submission semantics. Unchecked checkboxes
//! and disabled controls are left out of the encoded body; setting a value
//! on a checkbox checks it, and setting a disabled control re-enables it
//! (the site disables some inputs that still need to be submitted).

use scraper::{ElementRef, Html, Selector};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ControlKind {
    Input,
    Checkbox { checked: bool },
    Radio { checked: bool },
}

#[derive(Debug, Clone)]
struct Control {
    name: String,
    value: String,
    kind: ControlKind,
    disabled: bool,
}

/// One `<form>` element and its controls.
#[derive(Debug, Clone)]
pub struct FormModel {
    pub action: Option<String>,
    pub method: String,
    controls: Vec<Control>,
}

impl FormModel {
    /// Locate the form with the given id in an HTML document and parse its
    /// controls. Returns `None` when no such form exists.
    pub fn from_document(html: &str, id: &str) -> Option<FormModel> {
        let doc = Html::parse_document(html);
        let form_selector = Selector::parse(&format!("form[id='{id}']")).ok()?;
        let form_el = doc.select(&form_selector).next()?;

        let control_selector = Selector::parse("input, select, textarea").ok()?;
        let option_selector = Selector::parse("option").ok()?;

        let mut controls = Vec::new();
        for el in form_el.select(&control_selector) {
            let Some(name) = el.value().attr("name") else {
                continue;
            };
            let disabled = el.value().attr("disabled").is_some();

            match el.value().name() {
                "input" => {
                    let ty = el
                        .value()
                        .attr("type")
                        .unwrap_or("text")
                        .to_ascii_lowercase();
                    match ty.as_str() {
                        // Not representable as plain name=value pairs.
                        "file" | "image" | "button" | "reset" => continue,
                        "checkbox" => controls.push(Control {
                            name: name.to_string(),
                            value: el.value().attr("value").unwrap_or("on").to_string(),
                            kind: ControlKind::Checkbox {
                                checked: el.value().attr("checked").is_some(),
                            },
                            disabled,
                        }),
                        "radio" => {
                            let checked = el.value().attr("checked").is_some();
                            // At most one radio per group is checked; a later
                            // `checked` attribute wins, as in a browser.
                            if checked {
                                uncheck_radio_group(&mut controls, name);
                            }
                            controls.push(Control {
                                name: name.to_string(),
                                value: el.value().attr("value").unwrap_or("on").to_string(),
                                kind: ControlKind::Radio { checked },
                                disabled,
                            });
                        }
                        _ => controls.push(Control {
                            name: name.to_string(),
                            value: el.value().attr("value").unwrap_or("").to_string(),
                            kind: ControlKind::Input,
                            disabled,
                        }),
                    }
                }
                "select" => {
                    let options: Vec<ElementRef> = el.select(&option_selector).collect();
                    let chosen = options
                        .iter()
                        .find(|o| o.value().attr("selected").is_some())
                        .or_else(|| options.first());
                    let value = chosen
                        .map(|o| match o.value().attr("value") {
                            Some(v) => v.to_string(),
                            None => o.text().collect::<String>().trim().to_string(),
                        })
                        .unwrap_or_default();
                    controls.push(Control {
                        name: name.to_string(),
                        value,
                        kind: ControlKind::Input,
                        disabled,
                    });
                }
                "textarea" => controls.push(Control {
                    name: name.to_string(),
                    value: el.text().collect::<String>(),
                    kind: ControlKind::Input,
                    disabled,
                }),
                _ => {}
            }
        }

        Some(FormModel {
            action: form_el.value().attr("action").map(str::to_string),
            method: form_el
                .value()
                .attr("method")
                .unwrap_or("get")
                .to_ascii_lowercase(),
            controls,
        })
    }

    /// Current value of the first control with the given name.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Assign a value to a named control. Checkboxes and radios become
    /// checked (a radio's same-named siblings are unchecked), and disabled
    /// controls are re-enabled so the value actually submits.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let index = self
            .controls
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        if matches!(self.controls[index].kind, ControlKind::Radio { .. }) {
            uncheck_radio_group(&mut self.controls, name);
        }
        let control = &mut self.controls[index];
        control.value = value.to_string();
        control.disabled = false;
        match &mut control.kind {
            ControlKind::Checkbox { checked } | ControlKind::Radio { checked } => *checked = true,
            ControlKind::Input => {}
        }
        Ok(())
    }

    /// Encode the form the way a browser would on submit.
    pub fn encode(&self) -> Vec<(String, String)> {
        self.controls
            .iter()
            .filter(|c| !c.disabled)
            .filter(|c| {
                !matches!(
                    c.kind,
                    ControlKind::Checkbox { checked: false } | ControlKind::Radio { checked: false }
                )
            })
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }
}

fn uncheck_radio_group(controls: &mut [Control], name: &str) {
    for control in controls.iter_mut().filter(|c| c.name == name) {
        if let ControlKind::Radio { checked } = &mut control.kind {
            *checked = false;
        }
    }
}

/// Text of the document's `<title>` element, if it has a non-empty one.
pub fn page_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let el = doc.select(&selector).next()?;
    let text = el.text().collect::<String>();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
