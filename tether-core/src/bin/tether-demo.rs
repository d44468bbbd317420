//! Demo server: a counter, a greeter, and a todo list.
//!
//! ```text
//! RUST_LOG=tether_core=debug TETHER_ADDR=127.0.0.1:3000 cargo run --bin tether-demo
//! ```

use tether_core::view::tags::{a, button, div, h1, h3, input, li, span, ul};
use tether_core::{
    each_indexed, whether, App, PageRequest, Result, ServerConfig, SessionContext, Style, View,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct Todo {
    text: String,
    done: bool,
}

impl Todo {
    fn new(text: &str, done: bool) -> Self {
        Self {
            text: text.to_owned(),
            done,
        }
    }
}

fn counter_page(cx: &SessionContext, _: &PageRequest) -> Result<View> {
    let count = cx.signal(0i64)?;
    let increment = count.clone();
    let above_five = count.clone();

    Ok(div()
        .child(h1().child("Hello, World!"))
        .child(h3().child("The count is ").child(&count))
        .child(h3().child("The count doubled is ").child(count.map(|n| n * 2)))
        .child(whether(move || above_five.get() > 5, || {
            h1().child("The count is more than 5!")
        }))
        .child(
            button()
                .on("onclick", move || increment.update(|n| n + 1))
                .child("Click me!"),
        )
        .child(h3().child("Try out some other things:"))
        .child(
            ul().child(li().child(a().attr("href", "/greet/Rust").child("greeter")))
                .child(li().child(a().attr("href", "/todos").child("todo app"))),
        )
        .into())
}

fn greet_page(_: &SessionContext, request: &PageRequest) -> Result<View> {
    let name = request.param("name").unwrap_or("stranger");
    Ok(h1().child(format!("Hello, {name}!")).into())
}

fn todo_page(cx: &SessionContext, button_style: &Style) -> Result<View> {
    let todos = cx.signal(vec![
        Todo::new("some", false),
        Todo::new("example", true),
        Todo::new("todos", false),
    ])?;
    let text = cx.signal(String::new())?;

    let empty = todos.clone();
    let rows = {
        let todos = todos.clone();
        each_indexed(todos.clone(), move |todo: &Todo, index| {
            let todos = todos.clone();
            div()
                .child(
                    input()
                        .attr("type", "checkbox")
                        .attr("checked", todo.done)
                        .on("onchecked", move |checked: bool| {
                            todos.update(|items| {
                                let mut items = items.clone();
                                if let Some(item) = items.get_mut(index) {
                                    item.done = checked;
                                }
                                items
                            })
                        }),
                )
                .child(span().child(todo.text.clone()))
        })
    };

    let typed = text.clone();
    let add = {
        let todos = todos.clone();
        move || {
            let entry = text.get();
            if entry.is_empty() {
                return;
            }
            todos.update(|items| {
                let mut items = items.clone();
                items.push(Todo::new(&entry, false));
                items
            });
            text.set(String::new());
        }
    };
    let remove_done = move || {
        todos.update(|items| items.iter().filter(|todo| !todo.done).cloned().collect())
    };

    Ok((
        h1().child("Todo App"),
        whether(move || empty.with(Vec::is_empty), || h3().child("No todos!")),
        rows,
        input().on("oninput", move |value: String| typed.set(value)),
        button().class(button_style).on("onclick", add).child("Add Todo"),
        button()
            .class(button_style)
            .on("onclick", remove_done)
            .child("Remove Done"),
    )
        .into())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;

    let button_style = Style::scoped(
        "todo-button",
        ".todo-button{padding:4px 6px;background:rgb(200,200,200);border:none;\
         cursor:pointer;transition:.2s}\
         .todo-button:hover{background:rgb(230,230,230)}",
    );
    let todo_style = button_style.clone();

    App::new()
        .global_style(Style::global(
            "*{font-family:Seravek,'Gill Sans Nova',Ubuntu,Calibri,'DejaVu Sans',sans-serif}",
        ))
        .page("/", counter_page)
        .page("/greet/:name", greet_page)
        .page_with_styles("/todos", [button_style], move |cx, _| {
            todo_page(cx, &todo_style)
        })
        .serve(config)
        .await?;

    Ok(())
}
