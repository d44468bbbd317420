//! Markup Renderer
//!
//! Rendering is a recursive walk over a [`View`]:
//!
//! - `Empty` renders nothing.
//! - `Text` is emitted unchanged and `Number` in decimal.
//! - `Seq` renders its items in order.
//! - `Reactive` and `Deferred` are read or invoked, and the result rendered.
//! - `Element` renders an opening tag with attributes, its children, and a
//!   closing tag. Void elements without children get no closing tag.
//!
//! The walk has no cache of its own. Memoization lives in the combinators
//! that produced the deferred views.
//!
//! # Attributes
//!
//! | value               | emitted as                                  |
//! |---------------------|---------------------------------------------|
//! | text                | `name="escaped text"`                       |
//! | flag `true`/`false` | `name` / nothing                            |
//! | scoped style        | `name="class-name"`                         |
//! | global style        | error                                       |
//! | callback            | event attribute sending a trigger frame     |
//!
//! Callback attributes are registered in the [`ActionRegistry`] under
//! `<node id>@<attribute>`. `oninput` forwards the input's value and
//! `onchecked` (emitted as `onchange`) forwards the checkbox state, each as a
//! one-element JSON array; anything else sends a bare trigger.

use std::fmt::Write as _;

use html_escape::encode_double_quoted_attribute;
use tracing::trace;

use super::{ActionRegistry, HandlerId};
use crate::error::{Error, Result};
use crate::session::protocol::TRIGGER;
use crate::view::{AttrValue, Element, View};

/// Attribute whose callback receives `event.target.value`.
pub const VALUE_INPUT_ATTRIBUTE: &str = "oninput";

/// Attribute whose callback receives `event.target.checked`.
pub const CHECKED_TOGGLE_ATTRIBUTE: &str = "onchecked";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Renders one root view, keeping the actions of the latest render.
pub struct Renderer {
    root: View,
    actions: ActionRegistry,
    renders: u64,
}

impl Renderer {
    pub fn new(root: impl Into<View>) -> Self {
        Self {
            root: root.into(),
            actions: ActionRegistry::new(),
            renders: 0,
        }
    }

    /// Render the whole tree, replacing the action registry.
    pub fn render(&mut self) -> Result<String> {
        self.actions.clear();
        let out = {
            let mut pass = Pass {
                actions: &mut self.actions,
                out: String::new(),
            };
            pass.view(&self.root)?;
            pass.out
        };
        self.renders += 1;

        trace!(
            render = self.renders,
            bytes = out.len(),
            actions = self.actions.len(),
            "rendered view"
        );
        Ok(out)
    }

    /// Actions registered by the most recent render.
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn root(&self) -> &View {
        &self.root
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

/// Render a view once, discarding its actions.
pub fn render_to_string(view: &View) -> Result<String> {
    let mut actions = ActionRegistry::new();
    let mut pass = Pass {
        actions: &mut actions,
        out: String::new(),
    };
    pass.view(view)?;
    Ok(pass.out)
}

struct Pass<'a> {
    actions: &'a mut ActionRegistry,
    out: String,
}

impl Pass<'_> {
    fn view(&mut self, view: &View) -> Result<()> {
        match view {
            View::Empty => {}
            View::Text(text) => self.out.push_str(text),
            View::Number(number) => {
                let _ = write!(self.out, "{number}");
            }
            View::Seq(items) => {
                for item in items {
                    self.view(item)?;
                }
            }
            View::Element(element) => self.element(element)?,
            View::Reactive(cell) => self.view(&cell.current())?,
            View::Deferred(produce) => self.view(&produce())?,
        }
        Ok(())
    }

    fn element(&mut self, element: &Element) -> Result<()> {
        let tag = element.tag();
        self.out.push('<');
        self.out.push_str(tag);

        for (name, value) in element.attributes() {
            match value {
                AttrValue::Text(text) => {
                    let _ = write!(self.out, " {name}=\"{}\"", encode_double_quoted_attribute(text));
                }
                AttrValue::Flag(true) => {
                    self.out.push(' ');
                    self.out.push_str(name);
                }
                AttrValue::Flag(false) => {}
                AttrValue::Style(style) => {
                    let class_name = style.class_name().ok_or_else(|| Error::GlobalStyleAttribute {
                        tag: tag.to_owned(),
                        attribute: name.to_owned(),
                    })?;
                    let _ = write!(
                        self.out,
                        " {name}=\"{}\"",
                        encode_double_quoted_attribute(class_name)
                    );
                }
                AttrValue::Callback(callback) => {
                    let id = HandlerId::new(element.id(), name);
                    self.out.push_str(&trigger_attribute(name, &id));
                    self.actions.register(id, callback.clone());
                }
            }
        }
        self.out.push('>');

        let children = element.child_views();
        if children.is_empty() && VOID_ELEMENTS.contains(&tag) {
            return Ok(());
        }
        for child in children {
            self.view(child)?;
        }
        let _ = write!(self.out, "</{tag}>");
        Ok(())
    }
}

/// The event attribute that sends a trigger frame for `id`.
fn trigger_attribute(attribute: &str, id: &HandlerId) -> String {
    match attribute {
        VALUE_INPUT_ATTRIBUTE => format!(
            " {attribute}=\"ws.send('{TRIGGER}${id}$'+JSON.stringify([event.target.value]))\""
        ),
        CHECKED_TOGGLE_ATTRIBUTE => format!(
            " onchange=\"ws.send('{TRIGGER}${id}$'+JSON.stringify([event.target.checked]))\""
        ),
        _ => format!(" {attribute}=\"ws.send('{TRIGGER}${id}')\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::SessionContext;
    use crate::view::tags::{button, div, h3, input, span};
    use crate::view::Style;

    #[test]
    fn text_round_trips_unchanged() {
        let text = "<b>already markup</b> & friends";
        assert_eq!(render_to_string(&View::text(text)).unwrap(), text);
    }

    #[test]
    fn every_shape_renders() {
        let cx = SessionContext::new();
        let count = cx.signal(2).unwrap();
        let view = View::from((
            (),
            "a",
            7,
            -1.5,
            vec![View::from("b"), View::Empty],
            count.clone(),
            count.map(|n| n * 10),
            View::deferred(|| "c".into()),
        ));

        assert_eq!(render_to_string(&view).unwrap(), "a7-1.5b220c");
    }

    #[test]
    fn element_with_attributes_and_children() {
        let view = div()
            .attr("id", "main")
            .attr("title", "say \"hi\"")
            .attr("hidden", false)
            .attr("draggable", true)
            .child(span().child("x"));

        assert_eq!(
            render_to_string(&view.into()).unwrap(),
            "<div id=\"main\" title=\"say &quot;hi&quot;\" draggable><span>x</span></div>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let view = input().attr("type", "text");
        assert_eq!(render_to_string(&view.into()).unwrap(), "<input type=\"text\">");
    }

    #[test]
    fn scoped_style_renders_class_name() {
        let style = Style::scoped("btn", ".btn{}");
        let view = button().class(&style).child("Go");
        assert_eq!(
            render_to_string(&view.into()).unwrap(),
            "<button class=\"btn\">Go</button>"
        );
    }

    #[test]
    fn global_style_attribute_fails() {
        let view = button().class(&Style::global("*{}"));
        let err = render_to_string(&view.into()).unwrap_err();
        assert!(matches!(
            err,
            Error::GlobalStyleAttribute { ref tag, ref attribute } if tag == "button" && attribute == "class"
        ));
    }

    #[test]
    fn click_callback_renders_trigger_and_registers() {
        let element = button().on("onclick", || {}).child("Click");
        let id = HandlerId::new(element.id(), "onclick");
        let mut renderer = Renderer::new(element);

        let markup = renderer.render().unwrap();

        assert_eq!(
            markup,
            format!("<button onclick=\"ws.send('trigger${id}')\">Click</button>")
        );
        assert!(renderer.actions().contains(id.as_str()));
    }

    #[test]
    fn input_and_checked_callbacks_forward_values() {
        let text = input().on("oninput", |value: String| drop(value));
        let check = input()
            .attr("type", "checkbox")
            .on("onchecked", |checked: bool| drop(checked));
        let text_id = HandlerId::new(text.id(), "oninput");
        let check_id = HandlerId::new(check.id(), "onchecked");

        let mut renderer = Renderer::new((text, check));
        let markup = renderer.render().unwrap();

        assert!(markup.contains(&format!(
            "oninput=\"ws.send('trigger${text_id}$'+JSON.stringify([event.target.value]))\""
        )));
        assert!(markup.contains(&format!(
            "onchange=\"ws.send('trigger${check_id}$'+JSON.stringify([event.target.checked]))\""
        )));
        assert_eq!(renderer.actions().len(), 2);
    }

    #[test]
    fn handler_ids_are_stable_and_registry_is_rebuilt() {
        let cx = SessionContext::new();
        let show = cx.signal(true).unwrap();
        let kept = button().on("onclick", || {});
        let kept_id = HandlerId::new(kept.id(), "onclick");
        let kept_view: View = kept.into();
        let gated = View::from(button().on("onclick", || {}));

        let show_clone = show.clone();
        let root = View::from((
            kept_view,
            View::deferred(move || if show_clone.get() { gated.clone() } else { View::Empty }),
        ));
        let mut renderer = Renderer::new(root);

        let first = renderer.render().unwrap();
        assert_eq!(renderer.actions().len(), 2);

        show.set(false);
        let second = renderer.render().unwrap();
        assert_ne!(first, second);
        assert_eq!(renderer.actions().len(), 1);
        assert!(renderer.actions().contains(kept_id.as_str()));
        assert_eq!(renderer.render_count(), 2);
    }

    #[test]
    fn consecutive_renders_of_unchanged_tree_match() {
        let cx = SessionContext::new();
        let count = cx.signal(1).unwrap();
        let mut renderer = Renderer::new(h3().child("n = ").child(&count));

        let a = renderer.render().unwrap();
        let b = renderer.render().unwrap();
        assert_eq!(a, b);

        count.set(2);
        let c = renderer.render().unwrap();
        assert_eq!(c, "<h3>n = 2</h3>");
    }
}
