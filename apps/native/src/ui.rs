use foliocore_cart::{format_euros, CartLine};
use foliocore_index::{CatalogEntry, NavigablePage};
use foliocore_query::{filter, tag_preview};
use foliocore_shell::Route;
use foliod::overlay::ResultSection;
use foliod::{CART_PATH, HOME_PATH};
use iced::widget::{
    button, column, container, mouse_area, opaque, row, scrollable, stack, text, text_input,
    Column,
};
use iced::{Alignment, Color, Element, Fill, Length};

use crate::{App, Message};

const PANEL_WIDTH: f32 = 680.0;
const MUTED: Color = Color {
    r: 0.85,
    g: 0.72,
    b: 0.5,
    a: 1.0,
};

pub(crate) fn view(app: &App) -> Element<'_, Message> {
    let body = column![
        header(app),
        container(page_body(app)).padding(16).height(Fill)
    ];

    if app.service.overlay.is_open() {
        stack![body, search_overlay(app)].into()
    } else {
        body.into()
    }
}

fn header(app: &App) -> Element<'_, Message> {
    let home = button(text("FOLIO")).on_press(Message::Navigate(HOME_PATH.to_string()));
    let mut nav = row![home]
        .spacing(12)
        .align_y(Alignment::Center);

    for page in app.index.pages() {
        nav = nav.push(
            button(text(page.label.as_str()).size(13))
                .style(button::text)
                .on_press(Message::Navigate(page.href.clone())),
        );
    }

    let total_items = app.service.cart.total_items();
    let cart_label = if total_items > 0 {
        format!("Cart ({total_items})")
    } else {
        "Cart".to_string()
    };

    container(
        row![
            nav.width(Fill),
            button(text("Search")).on_press(Message::ToggleSearch),
            button(text(cart_label)).on_press(Message::Navigate(CART_PATH.to_string())),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .style(container::bordered_box)
    .into()
}

fn page_body(app: &App) -> Element<'_, Message> {
    let back = button(text("← Back")).style(button::secondary).on_press(Message::Back);

    let content: Element<'_, Message> = match app.service.current_route() {
        None => home(),
        Some(Route::Page(path)) if path == HOME_PATH => home(),
        Some(Route::Page(path)) if path == CART_PATH => cart_page(app),
        Some(Route::Page(path)) => match app.index.page_by_href(path) {
            Some(page) => column![
                text(page.label.as_str()).size(28),
                text(path.as_str()).color(MUTED),
            ]
            .spacing(8)
            .into(),
            None => not_found("Sorry, we couldn’t find this page."),
        },
        Some(Route::Product(id)) => match app.index.catalog_entry(id) {
            Some(entry) => product_detail(entry),
            None => not_found("Sorry, we couldn’t find this item."),
        },
        Some(Route::Search(query)) => search_results(app, query),
    };

    column![back, scrollable(content).height(Fill)].spacing(12).into()
}

fn home<'a>() -> Element<'a, Message> {
    column![
        text("Landscapes, collections and prints").size(28),
        text("Press / to search pages and the gallery.").color(MUTED),
    ]
    .spacing(8)
    .into()
}

fn not_found(message: &str) -> Element<'_, Message> {
    column![text("Not found").size(28), text(message)].spacing(8).into()
}

fn product_detail(entry: &CatalogEntry) -> Element<'_, Message> {
    let price = entry
        .price
        .map(format_euros)
        .unwrap_or_else(|| "Price on request".to_string());

    let mut details = column![text(entry.title.as_str()).size(28), text(price)].spacing(8);
    if let Some(tags) = tag_preview(&entry.tags) {
        details = details.push(text(tags).color(MUTED));
    }
    details
        .push(button(text("Add to cart")).on_press(Message::AddToCart(entry.id.clone())))
        .into()
}

fn search_results<'a>(app: &'a App, query: &'a str) -> Element<'a, Message> {
    let results = filter(&app.index, query);

    let mut listing = column![text(format!("Results for “{query}”")).size(24)].spacing(6);
    for page in results.pages {
        listing = listing.push(page_row(page));
    }
    for entry in results.catalog {
        let path = Route::Product(entry.id.clone()).path();
        listing = listing.push(entry_row(entry, Message::Navigate(path)));
    }
    listing.into()
}

fn cart_page(app: &App) -> Element<'_, Message> {
    let cart = &app.service.cart;
    let mut content = column![text("Your cart").size(28)].spacing(10);

    if cart.is_empty() {
        content = content.push(text("Cart is empty."));
    } else {
        for line in cart.items() {
            content = content.push(cart_row(line));
        }
    }

    content
        .push(text(format!("Subtotal: {}", format_euros(cart.subtotal()))).size(18))
        .push(
            button(text("Need help? Contact us →"))
                .style(button::text)
                .on_press(Message::Navigate("/contact".to_string())),
        )
        .into()
}

fn cart_row(line: &CartLine) -> Element<'_, Message> {
    let quantity = i64::from(line.quantity);

    row![
        column![
            text(line.title.as_str()),
            text(format!("{} • {}", line.category, line.location))
                .size(12)
                .color(MUTED),
            text(format!("€{}", line.unit_price)).size(12),
        ]
        .width(Fill),
        button(text("−")).on_press(Message::SetQuantity(line.id.clone(), quantity - 1)),
        text(line.quantity.to_string()),
        button(text("+")).on_press(Message::SetQuantity(line.id.clone(), quantity + 1)),
        button(text("Remove"))
            .style(button::danger)
            .on_press(Message::RemoveLine(line.id.clone())),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn search_overlay(app: &App) -> Element<'_, Message> {
    let overlay = &app.service.overlay;
    let results = overlay.results(&app.index);

    let prompt = row![
        text_input("Search pages & gallery… (Esc to close)", overlay.query())
            .id(app.search_input_id.clone())
            .on_input(Message::QueryChanged)
            .on_submit(Message::SubmitSearch)
            .padding(8)
            .size(16)
            .width(Fill),
        button(text("Search")).on_press(Message::SubmitSearch),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let pages = section(&results.pages, page_row);
    let catalog = section(&results.catalog, |entry| {
        entry_row(entry, Message::ChooseEntry(entry.id.clone()))
    });

    let footer = row![
        text(overlay.hint()).size(11).color(MUTED).width(Fill),
        button(text("Clear").size(11))
            .style(button::text)
            .on_press(Message::ClearQuery),
    ]
    .align_y(Alignment::Center);

    let panel = container(
        column![
            prompt,
            scrollable(row![pages, catalog].spacing(16)).height(Length::Fixed(320.0)),
            footer,
        ]
        .spacing(12),
    )
    .padding(16)
    .width(Length::Fixed(PANEL_WIDTH))
    .style(container::rounded_box);

    mouse_area(
        container(opaque(panel))
            .width(Fill)
            .height(Fill)
            .padding([96, 0])
            .center_x(Fill)
            .style(|_theme| container::Style {
                background: Some(Color::from_rgba8(0, 0, 0, 0.4).into()),
                ..container::Style::default()
            }),
    )
    .on_press(Message::CloseSearch)
    .into()
}

fn section<'a, T>(
    results: &ResultSection<'a, T>,
    render: impl Fn(&'a T) -> Element<'a, Message>,
) -> Column<'a, Message> {
    let mut listed = column![text(results.heading.clone()).size(11).color(MUTED)]
        .spacing(4)
        .width(Length::FillPortion(1));

    match results.placeholder() {
        Some(message) => listed.push(text(message).size(13).color(MUTED)),
        None => {
            for &item in &results.items {
                listed = listed.push(render(item));
            }
            listed
        }
    }
}

fn page_row(page: &NavigablePage) -> Element<'_, Message> {
    button(
        row![
            text(page.label.as_str()).size(14).width(Fill),
            text(page.href.as_str()).size(11).color(MUTED),
        ]
        .align_y(Alignment::Center),
    )
    .style(button::text)
    .width(Fill)
    .on_press(Message::ChoosePage(page.href.clone()))
    .into()
}

fn entry_row(entry: &CatalogEntry, on_press: Message) -> Element<'_, Message> {
    let mut label = column![text(entry.title.as_str()).size(14)];
    if let Some(tags) = tag_preview(&entry.tags) {
        label = label.push(text(tags).size(11).color(MUTED));
    }

    button(label)
        .style(button::text)
        .width(Fill)
        .on_press(on_press)
        .into()
}
