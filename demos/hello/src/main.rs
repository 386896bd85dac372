use berth::{prelude::*, RawHtml};

const MARKUP: &str = "<h1>Hello, berth!</h1><p>Mounted onto <code>#app</code>.</p>";

fn main() {
    console_error_panic_hook::set_once();

    let app = mount(RootView::new(RawHtml, MARKUP.to_string()), "app")
        .expect("failed to mount application");

    // The page owns the view from here on.
    app.leak();
}
