use hecs::Entity;
use tracing::debug;

use crate::ecs::components::Character;
use crate::ecs::systems::{combat, inventory, movement, status};
use crate::ecs::world::GameWorld;

pub const COMMAND_NOT_FOUND: &str = "Command not found";

type Handler = fn(&CommandManager, &mut GameWorld, Entity, &str) -> String;

/// A player command: its keyword aliases, the arguments it expects and
/// the system it runs. Arguments reach the handler rejoined by spaces.
pub struct Command {
    pub keywords: &'static [&'static str],
    pub args: &'static [&'static str],
    pub help: &'static str,
    handler: Handler,
}

impl Command {
    pub fn matches(&self, keyword: &str) -> bool {
        self.keywords.contains(&keyword)
    }
}

fn with_character(world: &GameWorld, entity: Entity, f: impl FnOnce(&Character) -> String) -> String {
    world.ecs.get::<&Character>(entity).map(|c| f(&*c)).unwrap_or_default()
}

// ── Handlers ─────────────────────────────────────────────────────────

fn look(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    status::show_surroundings(world, entity)
}

fn attack(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, args: &str) -> String {
    combat::attack(world, entity, args)
}

fn stats(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    with_character(world, entity, status::stats_string)
}

fn list_gear(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    with_character(world, entity, status::inventory_string)
}

fn take(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, args: &str) -> String {
    inventory::take_item(world, entity, args)
}

fn use_item(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, args: &str) -> String {
    match world.ecs.get::<&mut Character>(entity) {
        Ok(mut character) => inventory::use_consumable(&mut character, args),
        Err(_) => String::new(),
    }
}

fn go(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, args: &str) -> String {
    movement::move_character(world, entity, args)
}

fn north(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    movement::move_character(world, entity, "north")
}

fn south(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    movement::move_character(world, entity, "south")
}

fn east(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    movement::move_character(world, entity, "east")
}

fn west(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, _args: &str) -> String {
    movement::move_character(world, entity, "west")
}

fn discard(_commands: &CommandManager, world: &mut GameWorld, entity: Entity, args: &str) -> String {
    inventory::drop_gear(world, entity, args)
}

fn help(commands: &CommandManager, _world: &mut GameWorld, _entity: Entity, _args: &str) -> String {
    commands.help_text()
}

// ── Registry ─────────────────────────────────────────────────────────

/// Keyword registry. Registration order matters: on a keyword shared by
/// two commands the earlier one wins.
pub struct CommandManager {
    commands: Vec<Command>,
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandManager {
    pub fn new() -> Self {
        let mut manager = Self { commands: Vec::new() };
        manager.register_commands();
        manager
    }

    fn register(&mut self, keywords: &'static [&'static str], args: &'static [&'static str], help: &'static str, handler: Handler) {
        self.commands.push(Command {
            keywords,
            args,
            help,
            handler,
        });
    }

    fn register_commands(&mut self) {
        self.register(&["show", "look", "surroundings", "l"], &[], "Look around you", look);
        self.register(&["attack", "kill", "fight", "k"], &["target_name"], "Attack something here", attack);
        self.register(&["stats", "status", "health"], &[], "Show your stats", stats);
        self.register(&["inventory", "items", "gear", "i"], &[], "List your gear", list_gear);
        self.register(&["take", "pick", "get"], &["item_name"], "Pick up an item here", take);
        self.register(&["use", "consume", "drink", "eat"], &["item_name"], "Use a consumable", use_item);
        self.register(&["move", "go", "walk", "run"], &["direction"], "Move in a direction", go);
        self.register(&["north", "n"], &[], "Move north", north);
        self.register(&["south", "s"], &[], "Move south", south);
        self.register(&["east", "e"], &[], "Move east", east);
        self.register(&["west", "w"], &[], "Move west", west);
        self.register(&["drop", "discard"], &["gear_name"], "Drop a piece of gear", discard);
        self.register(&["help", "?"], &[], "List commands", help);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn find(&self, keyword: &str) -> Option<&Command> {
        self.commands.iter().find(|cmd| cmd.matches(keyword))
    }

    /// Run `text` for the player `entity`. The first word picks the
    /// command; the rest are its arguments.
    pub fn execute_command(&self, world: &mut GameWorld, entity: Entity, text: &str) -> String {
        let mut words = text.split_whitespace();
        let Some(keyword) = words.next() else {
            return COMMAND_NOT_FOUND.to_string();
        };
        let args = words.collect::<Vec<_>>().join(" ");

        match self.find(keyword) {
            Some(cmd) => (cmd.handler)(self, world, entity, &args),
            None => {
                debug!("Unknown command keyword: {}", keyword);
                COMMAND_NOT_FOUND.to_string()
            }
        }
    }

    pub fn help_text(&self) -> String {
        let mut help = String::from("Commands:\n");
        for cmd in &self.commands {
            let args: String = cmd.args.iter().map(|a| format!(" <{}>", a)).collect();
            help.push_str(&format!("{}{} - {}\n", cmd.keywords.join("/"), args, cmd.help));
        }
        help
    }
}
