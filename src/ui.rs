use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::controller::DragState;
use crate::tree::Node;

pub fn draw(frame: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    match app.controller.drag() {
        Some(drag) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(outer[0]);
            draw_drag_banner(frame, app, drag, chunks[0]);
            draw_tree(frame, app, chunks[1]);
        }
        None => draw_tree(frame, app, outer[0]),
    }

    if app.move_menu.is_some() {
        draw_move_menu(frame, app, outer[0]);
    }
    draw_status_bar(frame, app, outer[1]);
}

fn draw_tree(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let stats = app.tree().stats();
    let block = Block::default()
        .title(format!(
            " Documents ({} folders, {} documents) ",
            stats.folders, stats.documents
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    if app.tree().is_empty() {
        let paragraph = Paragraph::new("No documents. Press N to create a folder.")
            .block(block)
            .style(Style::default().fg(colors.doc_meta));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = app.tree().visible_nodes_with_depth();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|(node, depth)| ListItem::new(node_line(app, node, *depth)))
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(colors.selected_fg)
            .bg(colors.selected_bg)
            .add_modifier(Modifier::BOLD),
    );

    let selected_index = app
        .selection
        .as_ref()
        .and_then(|sel| visible.iter().position(|(node, _)| node.id() == sel));

    let mut list_state = ListState::default();
    list_state.select(selected_index);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn node_line<'a>(app: &'a App, node: &'a Node, depth: usize) -> Line<'a> {
    let colors = &app.config.colors;
    let indent = " ".repeat(depth * app.config.layout.indent_width);
    let editing = app.controller.editing_id() == Some(node.id());

    let (marker, name_style) = match node {
        Node::Folder(folder) => {
            let marker = if folder.is_expanded { "▼ " } else { "▶ " };
            (marker, Style::default().fg(colors.folder).add_modifier(Modifier::BOLD))
        }
        Node::Document(_) => ("  ", Style::default().fg(colors.document)),
    };

    let mut spans = vec![Span::raw(indent), Span::raw(marker)];

    if editing {
        let draft = app.controller.draft().unwrap_or_default();
        spans.push(Span::styled(
            format!("[{}_]", draft),
            name_style.add_modifier(Modifier::UNDERLINED),
        ));
    } else {
        spans.push(Span::styled(node.name(), name_style));
    }

    if let Node::Document(doc) = node {
        if app.config.layout.show_document_details {
            spans.push(Span::styled(
                format!("  {} · {}", doc.doc_type, doc.size_label),
                Style::default().fg(colors.doc_meta),
            ));
        }
    }

    if let Some(drag) = app.controller.drag() {
        if drag.node_id == node.id() {
            spans.push(Span::styled("  (moving)", Style::default().fg(colors.doc_meta)));
        } else if let Some(hover) = &drag.hover {
            if hover.target.as_deref() == Some(node.id()) {
                let (label, color) = if hover.can_drop {
                    ("  ← drop", colors.drop_allowed)
                } else {
                    ("  ✗", colors.drop_refused)
                };
                spans.push(Span::styled(label, Style::default().fg(color)));
            }
        }
    }

    Line::from(spans)
}

/// Text shown above the tree while a node is carried
pub fn drag_banner_text(drag: &DragState) -> String {
    let verdict = match &drag.hover {
        Some(hover) if hover.target.is_none() => "Drop here to move to root level",
        Some(hover) if hover.can_drop => "Drop here",
        Some(_) => "Cannot drop here",
        None => "Pick a folder",
    };
    format!("Moving \"{}\": {}", drag.node.name(), verdict)
}

fn draw_drag_banner(frame: &mut Frame, app: &App, drag: &DragState, area: Rect) {
    let colors = &app.config.colors;
    let color = match &drag.hover {
        Some(hover) if hover.can_drop => colors.drop_allowed,
        Some(_) => colors.drop_refused,
        None => colors.border,
    };

    let paragraph = Paragraph::new(drag_banner_text(drag)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_move_menu(frame: &mut Frame, app: &App, area: Rect) {
    let Some(node) = app.move_menu.as_deref().and_then(|id| app.tree().find(id)) else {
        return;
    };
    let colors = &app.config.colors;
    let root_key = app.config.keybindings.drop_at_root;

    let mut items: Vec<ListItem> = app
        .move_menu_entries()
        .iter()
        .enumerate()
        .map(|(i, folder)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(colors.doc_meta)),
                Span::styled(folder.name.as_str(), Style::default().fg(colors.folder)),
            ]))
        })
        .collect();
    items.push(ListItem::new(Line::from(vec![
        Span::styled(format!("{}. ", root_key), Style::default().fg(colors.doc_meta)),
        Span::raw("Root level"),
    ])));

    let height = (items.len() as u16 + 2).min(area.height);
    let popup = centered_rect(area, 40, height);

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Move \"{}\" to folder ", node.name()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(list, popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let help_text = if app.controller.editing_id().is_some() {
        "Type to rename | Enter: Save | Esc: Cancel"
    } else if app.move_menu.is_some() {
        "1-5: Choose folder | 0: Root level | Esc: Close"
    } else if app.controller.is_dragging() {
        "↑↓: Hover | Enter: Drop | 0: Drop at root | Esc: Cancel"
    } else {
        "↑↓: Navigate | Enter: Expand | n/N: New folder | r: Rename | d: Delete | m: Drag | M: Move | q: Quit"
    };

    let status_line = Line::from(vec![
        Span::styled(app.status_message.as_str(), Style::default().fg(colors.status_bar_fg)),
        Span::raw(" | "),
        Span::styled(help_text, Style::default().fg(colors.doc_meta)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(colors.status_bar_bg));
    frame.render_widget(paragraph, area);
}
