use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use barcart_core::Recipe;

use crate::app::{App, AppState};
use crate::form::FormField;
use crate::utils::{fit_field, truncate_string};

use super::styles;

/// Visible width of form text fields.
const FIELD_WIDTH: usize = 22;

/// Rows reserved for the favorites panel.
const FAVORITES_HEIGHT: u16 = 10;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Cocktail Recipe Finder";
    let help_hint = "[F1] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + help_hint.len() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(FAVORITES_HEIGHT)])
        .split(columns[0]);

    render_form(frame, app, left[0]);
    render_favorites(frame, app, left[1]);
    render_recipe_card(frame, app, columns[1]);
}

fn field_style(focused: bool) -> Style {
    if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    }
}

fn text_field<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let cursor = if focused { "▌" } else { " " };
    Line::from(vec![
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{}{}", fit_field(value, FIELD_WIDTH), cursor), field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let mut lines = vec![];

    let spirit_focused = form.focus == FormField::Spirit;
    lines.push(Line::from(vec![
        Span::styled(" Primary spirit:   ", styles::muted_style()),
        Span::styled(format!("◀ {} ▶", form.spirit_label()), field_style(spirit_focused)),
    ]));
    lines.push(Line::from(""));

    lines.push(text_field(
        " Secondary:        ",
        &form.secondary,
        form.focus == FormField::Secondary,
    ));
    lines.push(Line::from(""));

    for (i, juice) in form.juices.iter().enumerate() {
        let label = if i == 0 { " Juices:           " } else { "                   " };
        lines.push(text_field(label, juice, form.focus == FormField::Juice(i)));
    }
    lines.push(Line::from(Span::styled(
        "                   ^N add  ^D remove",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    lines.push(text_field(
        " Cocktail name:    ",
        &form.name,
        form.focus == FormField::Name,
    ));
    lines.push(Line::from(""));

    let submit_focused = form.focus == FormField::Submit;
    let button = if submit_focused { " ▶ Find Recipe ◀ " } else { "   Find Recipe   " };
    lines.push(Line::from(vec![
        Span::raw("           ["),
        Span::styled(button, field_style(submit_focused)),
        Span::raw("]"),
    ]));

    let mix = mix_summary(app);
    if !mix.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Mix: ", styles::highlight_style()),
            Span::raw(mix),
        ]));
    }

    let block = Block::default()
        .title(" Describe your drink ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// "Gin + Lillet + lime, orange" from whatever the form has filled in.
fn mix_summary(app: &App) -> String {
    let form = &app.form;
    let mut parts: Vec<String> = Vec::new();
    if form.spirit.is_some() {
        parts.push(form.spirit_label().to_string());
    }
    if !form.secondary.trim().is_empty() {
        parts.push(form.secondary.trim().to_string());
    }
    let juices = form.filled_juices();
    if !juices.is_empty() {
        parts.push(juices.join(", "));
    }
    parts.join(" + ")
}

fn render_favorites(frame: &mut Frame, app: &App, area: Rect) {
    let favorites = app.favorites.items();
    let width = (area.width as usize).saturating_sub(6);

    let block = Block::default()
        .title(format!(" Favorites ({}) ", favorites.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if favorites.is_empty() {
        let empty = Paragraph::new(Span::styled(" No favorites yet.", styles::muted_style()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = favorites
        .iter()
        .enumerate()
        .map(|(i, fav)| {
            let style = if i == app.favorites_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(format!(" {}", truncate_string(&fav.name, width)))).style(style)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.favorites_selection));

    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_recipe_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Recipe ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.recipe.is_some()));

    let lines = if let Some(ref recipe) = app.recipe {
        recipe_lines(recipe, app.recipe_from_cache)
    } else if let Some(ref error) = app.error {
        vec![Line::from(Span::styled(format!(" {}", error), styles::error_style()))]
    } else if app.is_searching() {
        vec![Line::from(Span::styled(" Searching...", styles::muted_style()))]
    } else {
        vec![Line::from(Span::styled(
            " Type a cocktail name and press Enter.",
            styles::muted_style(),
        ))]
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn recipe_lines(recipe: &Recipe, from_cache: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", recipe.name),
        styles::title_style(),
    ))];

    let details: Vec<&str> = [&recipe.category, &recipe.glass, &recipe.alcoholic]
        .into_iter()
        .filter_map(|d| d.as_deref())
        .collect();
    if !details.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}", details.join(" · ")),
            styles::muted_style(),
        )));
    }
    if let Some(ref thumb) = recipe.thumbnail {
        lines.push(Line::from(Span::styled(format!(" {}", thumb), styles::muted_style())));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Ingredients", styles::highlight_style())));
    for ingredient in recipe.display_ingredients() {
        lines.push(Line::from(format!("  • {}", ingredient)));
    }
    lines.push(Line::from(""));

    if let Some(ref instructions) = recipe.instructions {
        lines.push(Line::from(Span::styled(" Instructions", styles::highlight_style())));
        lines.push(Line::from(format!(" {}", instructions)));
        lines.push(Line::from(""));
    }

    let mut footer = vec![
        Span::styled(" [Ctrl+S]", styles::help_key_style()),
        Span::styled(" Save to favorites", styles::help_desc_style()),
    ];
    if from_cache {
        footer.push(Span::styled("   (cached)", styles::success_style()));
    }
    lines.push(Line::from(footer));
    lines
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[Enter] search | [^S] save | [Esc] quit";

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} saved ", app.favorites.len()),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(56, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(format!("  barcart {}", version), styles::title_style())),
        Line::from(Span::styled(format!("  {}", app.config.api_base_url()), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Form", styles::highlight_style())),
        help_line("  Tab/↓     ", "Next field"),
        help_line("  S-Tab/↑   ", "Previous field"),
        help_line("  ←/→       ", "Change spirit"),
        help_line("  Ctrl+N    ", "Add juice field"),
        help_line("  Ctrl+D    ", "Remove focused juice field"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("  Enter     ", "Find recipe"),
        help_line("  Ctrl+S    ", "Save recipe to favorites"),
        help_line("  PgUp/PgDn ", "Scroll favorites"),
        help_line("  Esc       ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("F1", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use barcart_core::{ApiClient, Config, FavoritesStore, Ingredient, MemoryStorage, RecipeLookup};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn app() -> App {
        let api = ApiClient::with_base_url("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        App::with_services(
            Config::default(),
            RecipeLookup::new(Box::new(MemoryStorage::new()), api),
            FavoritesStore::open(Box::new(MemoryStorage::new())),
        )
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_empty_favorites_message() {
        assert!(screen(&app()).contains("No favorites yet."));
    }

    #[test]
    fn test_recipe_card_shows_ingredients() {
        let mut app = app();
        app.recipe = Some(Recipe {
            ingredients: vec![Ingredient { name: "Gin".to_string(), measure: Some("2 oz".to_string()) }],
            instructions: Some("Stir.".to_string()),
            ..Recipe::named("Martini")
        });
        let text = screen(&app);
        assert!(text.contains("Martini"));
        assert!(text.contains("Gin 2 oz"));
        assert!(text.contains("Stir."));
    }

    #[test]
    fn test_error_is_shown() {
        let mut app = app();
        app.error = Some("No recipe found. Try another name.".to_string());
        assert!(screen(&app).contains("No recipe found. Try another name."));
    }

    #[test]
    fn test_mix_summary() {
        let mut app = app();
        assert_eq!(mix_summary(&app), "");
        app.form.spirit = Some(1);
        app.form.secondary = "Lillet".to_string();
        app.form.juices = vec!["lime".to_string(), "orange".to_string()];
        assert_eq!(mix_summary(&app), "Gin + Lillet + lime, orange");
    }
}
