// src/phone/systems.rs
//
// Spawning the phone overlay, routing keyboard and button input into the
// shell, and mounting the view that matches the current app.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use super::components::{
    PhoneAppPanel, PhoneBackButton, PhoneButton, PhoneContent, PhoneHomeGrid, PhoneRoot,
    PhoneTitle, PhoneView,
};
use super::config::PhoneSettings;
use super::shell::{PhoneApp, PhoneShell};

// Visual constants
const PHONE_BACKGROUND: Color = Color::srgb(0.086, 0.086, 0.11);
const PHONE_BORDER: Color = Color::srgba(1.0, 1.0, 1.0, 0.03);
const HEADER_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.2);
const TILE_BACKGROUND: Color = Color::srgba(1.0, 1.0, 1.0, 0.05);
const TILE_HOVER: Color = Color::srgba(1.0, 1.0, 1.0, 0.1);
const HEADER_BUTTON_BACKGROUND: Color = Color::NONE;
const ACCENT_COLOR: Color = Color::srgb(0.0, 1.0, 0.616); // #00ff9d
const TEXT_COLOR: Color = Color::WHITE;
const MUTED_TEXT_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);

const PHONE_WIDTH: f32 = 360.0;
const PHONE_MAX_HEIGHT: f32 = 600.0;
const HEADER_HEIGHT: f32 = 50.0;

/// Spawns the (hidden) phone panel with its header and empty content area.
pub fn spawn_phone(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Percent(10.0),
                right: Val::Px(24.0),
                width: Val::Px(PHONE_WIDTH),
                height: Val::Percent(80.0),
                max_height: Val::Px(PHONE_MAX_HEIGHT),
                border: UiRect::all(Val::Px(1.0)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(PHONE_BACKGROUND),
            BorderColor::from(PHONE_BORDER),
            Visibility::Hidden,
            PhoneRoot,
            Name::new("Phone"),
        ))
        .with_children(|phone| {
            phone
                .spawn((
                    Node {
                        height: Val::Px(HEADER_HEIGHT),
                        padding: UiRect::horizontal(Val::Px(16.0)),
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        column_gap: Val::Px(8.0),
                        ..default()
                    },
                    BackgroundColor(HEADER_BACKGROUND),
                ))
                .with_children(|header| {
                    spawn_header_button(header, "<", PhoneButton::Back, PhoneBackButton);

                    header.spawn((
                        Text::new("HyperFone"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        Node {
                            flex_grow: 1.0,
                            ..default()
                        },
                        PhoneTitle,
                    ));

                    spawn_header_button(header, "X", PhoneButton::Close, ());
                });

            phone.spawn((
                Node {
                    flex_grow: 1.0,
                    padding: UiRect::all(Val::Px(16.0)),
                    flex_direction: FlexDirection::Column,
                    overflow: Overflow::clip_y(),
                    ..default()
                },
                PhoneContent,
                Name::new("Phone Content"),
            ));
        });
}

fn spawn_header_button(
    header: &mut ChildSpawnerCommands<'_>,
    label: &str,
    action: PhoneButton,
    extra: impl Bundle,
) {
    header
        .spawn((
            Node {
                padding: UiRect::all(Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                // The back button starts hidden; the view sync reveals it.
                display: if action == PhoneButton::Back {
                    Display::None
                } else {
                    Display::Flex
                },
                ..default()
            },
            Button,
            Interaction::None,
            BackgroundColor(HEADER_BUTTON_BACKGROUND),
            action,
            extra,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
        });
}

/// `Alt+H` toggles the phone and `Escape` closes it.
pub fn handle_phone_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<PhoneSettings>,
    mut shell: ResMut<PhoneShell>,
) {
    if !settings.keyboard_shortcuts {
        return;
    }

    let alt = keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]);
    if alt && keyboard.just_pressed(KeyCode::KeyH) {
        shell.toggle();
        debug!("Phone toggled (open: {})", shell.is_open());
    } else if keyboard.just_pressed(KeyCode::Escape) && shell.is_open() {
        shell.close();
        debug!("Phone closed with Escape");
    }
}

/// Applies app tile, back and close presses to the shell.
#[allow(clippy::type_complexity)]
pub fn handle_phone_buttons(
    mut shell: ResMut<PhoneShell>,
    buttons: Query<(&Interaction, &PhoneButton), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }

        match *action {
            PhoneButton::Launch(app) => shell.open_app(app),
            PhoneButton::Back => shell.back(),
            PhoneButton::Close => shell.close(),
        }
    }
}

/// Hover feedback for app tiles.
#[allow(clippy::type_complexity)]
pub fn highlight_phone_buttons(
    mut buttons: Query<
        (&Interaction, &PhoneButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, action, mut background) in buttons.iter_mut() {
        let idle = match action {
            PhoneButton::Launch(_) => TILE_BACKGROUND,
            PhoneButton::Back | PhoneButton::Close => HEADER_BUTTON_BACKGROUND,
        };
        background.0 = match interaction {
            Interaction::Hovered | Interaction::Pressed => TILE_HOVER,
            Interaction::None => idle,
        };
    }
}

/// Mirrors the shell into the UI: visibility, title, back button and the
/// mounted view. The view is only rebuilt when the current app changes.
pub fn sync_phone_view(
    mut commands: Commands,
    shell: Res<PhoneShell>,
    mut view: ResMut<PhoneView>,
    mut roots: Query<&mut Visibility, With<PhoneRoot>>,
    mut titles: Query<&mut Text, With<PhoneTitle>>,
    mut back_buttons: Query<&mut Node, With<PhoneBackButton>>,
    contents: Query<Entity, With<PhoneContent>>,
) {
    if !shell.is_changed() {
        return;
    }

    for mut visibility in roots.iter_mut() {
        *visibility = if shell.is_open() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
    for mut title in titles.iter_mut() {
        title.0 = shell.title().to_string();
    }
    for mut node in back_buttons.iter_mut() {
        node.display = if shell.shows_back() {
            Display::Flex
        } else {
            Display::None
        };
    }

    let current = shell.current();
    if view.mounted == Some(current) {
        return;
    }
    let Ok(content) = contents.single() else {
        warn!("Phone content node missing; cannot mount {}", current);
        return;
    };

    if let Some(previous) = view.panel.take() {
        commands.entity(previous).despawn();
    }

    let panel = match current {
        PhoneApp::Home => spawn_home_grid(&mut commands),
        app => spawn_app_panel(&mut commands, app),
    };
    commands.entity(content).add_child(panel);

    debug!(
        "Phone view mounted: {} (replacing {:?})",
        current,
        view.mounted.map(PhoneApp::id)
    );
    view.mounted = Some(current);
    view.panel = Some(panel);
}

fn spawn_home_grid(commands: &mut Commands) -> Entity {
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            PhoneHomeGrid,
            Name::new("Phone Home"),
        ))
        .with_children(|home| {
            home.spawn((
                Text::new("Welcome to HyperFone"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
            home.spawn((
                Text::new("Select an app to get started!"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(MUTED_TEXT_COLOR),
            ));

            home.spawn(Node {
                display: Display::Grid,
                grid_template_columns: RepeatedGridTrack::flex(3, 1.0),
                row_gap: Val::Px(16.0),
                column_gap: Val::Px(16.0),
                margin: UiRect::top(Val::Px(8.0)),
                ..default()
            })
            .with_children(|grid| {
                for app in PhoneApp::ALL {
                    spawn_app_tile(grid, app);
                }
            });
        })
        .id()
}

fn spawn_app_tile(grid: &mut ChildSpawnerCommands<'_>, app: PhoneApp) {
    let glyph: String = app.name().chars().take(1).collect();

    grid.spawn((
        Node {
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            padding: UiRect::all(Val::Px(16.0)),
            row_gap: Val::Px(8.0),
            ..default()
        },
        Button,
        Interaction::None,
        BackgroundColor(TILE_BACKGROUND),
        PhoneButton::Launch(app),
        Name::new(format!("Phone Tile {}", app.id())),
    ))
    .with_children(|tile| {
        tile.spawn((
            Text::new(glyph),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(ACCENT_COLOR),
        ));
        tile.spawn((
            Text::new(app.name()),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(TEXT_COLOR),
        ));
    });
}

fn spawn_app_panel(commands: &mut Commands, app: PhoneApp) -> Entity {
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            PhoneAppPanel { app },
            Name::new(format!("Phone App {}", app.id())),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(app.name()),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(ACCENT_COLOR),
            ));
            panel.spawn((
                Text::new("Nothing here yet."),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(MUTED_TEXT_COLOR),
            ));
        })
        .id()
}
