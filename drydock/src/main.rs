// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::{
    collections::BTreeMap,
    fmt, fs,
    io::{self, BufRead, Write},
};

use clap::{value_t, App, Arg};
use once_cell::sync::Lazy;
use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};
use regex::{Captures, Regex};
use tracing_subscriber::EnvFilter;

use shipyard::{
    blueprint::{BlueprintLayout, CannotPlaceReason, UpgradeError},
    board::GridBounds,
    hull::PlateKind,
    modules::{AttachedDirection, DamageCondition},
    vessel::{AttackReport, CrewMember},
    Blueprint, DesignCatalog, GridCoordinate, Module, ModuleId, Placeable, Rotation,
    StatSettings, StatSheet, Vessel, WeaponType,
};

/// Empty tiles shown around the structure when printing the grid.
const VIEW_MARGIN: i32 = 2;

/// Number of random positions tried per module before giving up.
const RANDOM_ATTEMPTS: usize = 2000;

fn main() -> io::Result<()> {
    let matches = App::new("Drydock")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Interactive command line shipyard: design a vessel, then shoot at it.")
        .arg(
            Arg::with_name("designs")
                .short("d")
                .long("designs")
                .value_name("FILE")
                .help("load room and weapon designs from a JSON file instead of the standard set")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("WIDTH")
                .help("width of the build grid")
                .takes_value(true)
                .default_value("60"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("HEIGHT")
                .help("height of the build grid")
                .takes_value(true)
                .default_value("60"),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .value_name("SEED")
                .help("seed for random placement and hull plate variants")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more; repeat for more detail"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let loaded;
    let catalog = match matches.value_of("designs") {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            loaded = DesignCatalog::from_json(&json)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            &loaded
        }
        None => DesignCatalog::standard(),
    };

    let width = value_t!(matches, "width", u32).unwrap_or_else(|e| e.exit());
    let height = value_t!(matches, "height", u32).unwrap_or_else(|e| e.exit());
    let bounds = GridBounds::try_new(width, height).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "grid must be at least 1x1")
    })?;
    let mut rng = if matches.is_present("seed") {
        StdRng::seed_from_u64(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit()))
    } else {
        StdRng::from_entropy()
    };

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let settings = StatSettings::default();

    let mut blueprint = Blueprint::new(bounds);
    loop {
        blueprint = match build(catalog, &settings, &mut rng, blueprint, &mut input)? {
            Some(blueprint) => blueprint,
            None => return Ok(()),
        };
        match blueprint.launch(settings.clone()) {
            Ok(vessel) => return fight(vessel, &mut input),
            Err(returned) => {
                println!("Commit at least one room before launching.");
                blueprint = returned;
            }
        }
    }
}

/// Edit the blueprint until the player launches it (`Some`) or quits (`None`).
fn build(
    catalog: &DesignCatalog,
    settings: &StatSettings,
    rng: &mut impl Rng,
    mut blueprint: Blueprint,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<Option<Blueprint>> {
    enum Command {
        Add(String, usize),
        Place(ModuleId, GridCoordinate, Rotation),
        Check(ModuleId, GridCoordinate, Rotation),
        Release(ModuleId),
        Remove(ModuleId),
        Turn(ModuleId),
        Level(ModuleId, usize),
        Tier(Option<u8>),
        Randomize,
        Stats,
        Hull,
        Export(Option<String>),
        Import(String),
        Designs,
        Launch,
        Quit,
        Help,
    }
    /// Matchers for commands with args.
    static ADD: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?xi)(?:add|new)\s+
        (?P<design>[\w-]+)
        (?:\s+(?:level\s+)?(?P<level>[0-9]+))?$",
        )
        .unwrap()
    });
    static PLACE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?xi)(?P<cmd>place|put|check|probe)\s+
        \#?(?P<id>[0-9]+)\s+
        (?:(?:at|on|to|->|=>)\s+)?
        (?P<x>-?[0-9]+)(?:\s*,\s*|\s+)(?P<y>-?[0-9]+)
        (?:\s+(?P<rot>[0-9]+))?$",
        )
        .unwrap()
    });
    static BY_ID: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?xi)(?P<cmd>release|remove|turn)\s+\#?(?P<id>[0-9]+)$").unwrap()
    });
    static LEVEL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?xi)(?:level|upgrade)\s+\#?(?P<id>[0-9]+)\s+(?P<level>[0-9]+)$").unwrap()
    });
    static TIER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?xi)(?:tier|hull\s+tier)\s+(?P<tier>[0-9]+|none)$").unwrap());
    static EXPORT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?xi)(?:export|save)(?:\s+(?P<path>\S+))?$").unwrap());
    static IMPORT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?xi)(?:import|load)\s+(?P<path>\S+)$").unwrap());

    println!();
    println!("Build your vessel. Type help or ? for commands.");
    loop {
        println!();
        show_modules(&blueprint);
        println!("Your current blueprint:");
        show_board(&BoardWindow::around(blueprint.occupancy().tiles(), blueprint.bounds()), |tile| {
            match blueprint.module_at(tile).and_then(|id| blueprint.module(id).map(|m| (id, m))) {
                Some((id, module)) => BuildCell::Module(ModuleTag(id, module.as_weapon().is_some())),
                None => BuildCell::Empty,
            }
        });
        println!();

        let cmd = input.read_input("> ", |input| match input.to_ascii_lowercase().as_str() {
            "?" | "help" | "h" => Some(Command::Help),
            "randomize" | "rand" | "random" => Some(Command::Randomize),
            "stats" => Some(Command::Stats),
            "hull" | "plates" => Some(Command::Hull),
            "designs" | "catalog" => Some(Command::Designs),
            "launch" | "done" => Some(Command::Launch),
            "quit" | "exit" => Some(Command::Quit),
            _ => if let Some(captures) = ADD.captures(input) {
                let level = match captures.name("level") {
                    Some(level) => level.as_str().parse().ok()?,
                    None => 0,
                };
                Some(Command::Add(captures["design"].to_ascii_lowercase(), level))
            } else if let Some(captures) = PLACE.captures(input) {
                let id = parse_id(&captures)?;
                let tile = parse_tile(&captures)?;
                let rotation = match captures.name("rot") {
                    None => Rotation::Deg0,
                    Some(rot) => match rot.as_str().parse().ok().and_then(Rotation::from_degrees) {
                        Some(rotation) => rotation,
                        None => {
                            println!("invalid rotation {}, choose 0, 90, 180 or 270", rot.as_str());
                            return None;
                        }
                    },
                };
                if captures["cmd"].eq_ignore_ascii_case("place") || captures["cmd"].eq_ignore_ascii_case("put") {
                    Some(Command::Place(id, tile, rotation))
                } else {
                    Some(Command::Check(id, tile, rotation))
                }
            } else if let Some(captures) = BY_ID.captures(input) {
                let id = parse_id(&captures)?;
                Some(match captures["cmd"].to_ascii_lowercase().as_str() {
                    "release" => Command::Release(id),
                    "remove" => Command::Remove(id),
                    _ => Command::Turn(id),
                })
            } else if let Some(captures) = LEVEL.captures(input) {
                let id = parse_id(&captures)?;
                let level = captures["level"].parse().ok()?;
                Some(Command::Level(id, level))
            } else if let Some(captures) = TIER.captures(input) {
                match &captures["tier"] {
                    tier if tier.eq_ignore_ascii_case("none") => Some(Command::Tier(None)),
                    tier => match tier.parse() {
                        Ok(tier) => Some(Command::Tier(Some(tier))),
                        Err(_) => {
                            println!("invalid hull tier {}", tier);
                            None
                        }
                    },
                }
            } else if let Some(captures) = EXPORT.captures(input) {
                Some(Command::Export(captures.name("path").map(|path| path.as_str().to_owned())))
            } else if let Some(captures) = IMPORT.captures(input) {
                Some(Command::Import(captures["path"].to_owned()))
            } else {
                println!("Invalid blueprint command \"{}\". Use '?' for help", input);
                None
            },
        })?;

        match cmd {
            Command::Add(design, level) => {
                let module: Result<Module, _> = if catalog.weapon(&design).is_ok() {
                    catalog.build_weapon(&design).map(Module::from)
                } else {
                    catalog.build_room(&design, level).map(Module::from)
                };
                match module {
                    Ok(module) => {
                        let id = blueprint.add_module(module);
                        println!("Added {} as {}.", design, id);
                    }
                    Err(err) => println!("{}", err),
                }
            }
            Command::Place(id, tile, rotation) => {
                if let Err(err) = blueprint.commit(id, tile, rotation) {
                    println!("Invalid placement: {}.", describe_place(err.reason()));
                }
            }
            Command::Check(id, tile, rotation) => match blueprint.check_placement(id, tile, rotation) {
                Ok(()) => {
                    let tiles = blueprint.preview(id, tile, rotation).map_or(0, |fp| fp.tiles().len());
                    println!("{} fits there, covering {} tiles.", id, tiles);
                }
                Err(reason) => println!("{} does not fit: {}.", id, describe_place(reason)),
            },
            Command::Release(id) => match blueprint.release(id) {
                Some(tiles) => println!("Released {} tiles.", tiles.len()),
                None => println!("{} is not on the grid.", id),
            },
            Command::Remove(id) => match blueprint.remove_module(id) {
                Ok(module) => println!("Removed {} {}.", module.name(), id),
                Err(err) => println!("{}", err),
            },
            Command::Turn(id) => {
                let next = blueprint
                    .module(id)
                    .and_then(Module::as_weapon)
                    .map(|weapon| weapon.direction().next());
                match next {
                    Some(direction) => {
                        blueprint.set_weapon_direction(id, direction);
                        println!("{} now faces {}.", id, DirectionName(direction));
                    }
                    None => println!("{} is not a weapon.", id),
                }
            }
            Command::Level(id, level) => match blueprint.set_room_level(id, level) {
                Ok(()) => println!("{} is now level {}.", id, level),
                Err(UpgradeError::Placement(err)) => {
                    println!("Level {} does not fit: {}.", level, describe_place(err.reason()))
                }
                Err(UpgradeError::MissingDesign(err)) => {
                    match blueprint.module(id).and_then(Module::as_room) {
                        Some(room) => println!(
                            "{} goes from level 0 to {}.",
                            room.name(),
                            room.design().max_level()
                        ),
                        None => println!("{}", err),
                    }
                }
                Err(err) => println!("{}", err),
            },
            Command::Tier(None) => blueprint.set_hull_tier(None),
            Command::Tier(Some(level)) => {
                if let Err(err) = blueprint.set_hull_level(level) {
                    println!("{}", err);
                }
            }
            Command::Randomize => place_randomly(rng, &mut blueprint),
            Command::Stats => {
                let (sheet, _) = blueprint.aggregate_stats(settings);
                show_stats(&sheet);
                println!("Total module cost: {}", blueprint.total_cost());
            }
            Command::Hull => show_hull(rng, &blueprint),
            Command::Export(path) => {
                let json = blueprint
                    .layout()
                    .to_json()
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
                match path {
                    Some(path) => {
                        fs::write(&path, json)?;
                        println!("Saved layout to {}.", path);
                    }
                    None => println!("{}", json),
                }
            }
            Command::Import(path) => match import(catalog, *blueprint.bounds(), &path) {
                Ok(restored) => blueprint = restored,
                Err(err) => println!("Could not load {}: {}", path, err),
            },
            Command::Designs => show_designs(catalog),
            Command::Launch => return Ok(Some(blueprint)),
            Command::Quit => return Ok(None),
            Command::Help => {
                println!(
                    "Available Commands:
    designs                         list the room and weapon designs.
    add <design> [level]            add a module built from a design. Levels start at 0.
    place #<id> <x>,<y> [rotation]  commit the module to the grid. Rotation is 0, 90, 180
        or 270 degrees. Weapons only support 0.
    check #<id> <x>,<y> [rotation]  check whether the module would fit, without moving it.
    release #<id>                   take the module off the grid but keep it.
    remove #<id>                    delete a module that is not on the grid.
    turn #<id>                      point a weapon in its next direction.
    level #<id> <level>             change the level of a room.
    tier <0-2|none>                 set the hull armor tier.
    randomize                       place every module not yet on the grid at random.
    stats                           show the stats of the design.
    hull                            show the hull plates and what they cost.
    export [file]                   print the layout as JSON, or save it to a file.
    import <file>                   replace the blueprint with a saved layout.
    launch                          launch the vessel and start shooting at it.
    quit                            leave without launching."
                );
            }
        }
    }
}

/// Shoot at a launched vessel until it is destroyed or the player quits.
fn fight(mut vessel: Vessel, input: &mut InputReader<impl BufRead>) -> io::Result<()> {
    enum Action {
        Attack(f32, WeaponType, GridCoordinate),
        Board(String, GridCoordinate),
        Tick(f32),
        Repair(ModuleId, Option<f32>),
        Power(ModuleId, bool),
        Stats,
        Quit,
        Help,
    }
    static ATTACK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?xi)(?:attack|fire|hit)\s+
        (?P<damage>[0-9]+(?:\.[0-9]+)?)\s+
        (?P<weapon>\w+)\s+
        (?:(?:at|on)\s+)?
        (?P<x>-?[0-9]+)(?:\s*,\s*|\s+)(?P<y>-?[0-9]+)$",
        )
        .unwrap()
    });
    static BOARD: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?xi)board\s+
        (?P<name>\w+)\s+
        (?:(?:at|on|to)\s+)?
        (?P<x>-?[0-9]+)(?:\s*,\s*|\s+)(?P<y>-?[0-9]+)$",
        )
        .unwrap()
    });
    static TICK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?xi)(?:tick|wait)\s+(?P<secs>[0-9]+(?:\.[0-9]+)?)$").unwrap()
    });
    static REPAIR: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?xi)(?P<cmd>repair|fix)\s+\#?(?P<id>[0-9]+)
        (?:\s+(?P<amount>[0-9]+(?:\.[0-9]+)?))?$",
        )
        .unwrap()
    });
    static POWER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?xi)(?P<state>on|off)\s+\#?(?P<id>[0-9]+)$").unwrap());

    println!();
    println!("Vessel launched. Type help or ? for commands.");
    loop {
        println!();
        show_status(&vessel);
        show_board(&BoardWindow::around(vessel_tiles(&vessel), vessel.bounds()), |tile| {
            if vessel.crew_at(tile).is_some() {
                return VesselCell::Crew;
            }
            match vessel.module_at(tile) {
                Some((_, Module::Room(room))) if room.is_broken_down() => VesselCell::Wreck,
                Some((id, module)) => VesselCell::Module(ModuleTag(id, module.as_weapon().is_some())),
                None => VesselCell::Empty,
            }
        });
        if vessel.is_destroyed() {
            println!("The vessel is destroyed.");
            return Ok(());
        }
        println!();

        let action = input.read_input("> ", |input| match input.to_ascii_lowercase().as_str() {
            "?" | "help" | "h" => Some(Action::Help),
            "stats" => Some(Action::Stats),
            "quit" | "exit" => Some(Action::Quit),
            _ => if let Some(captures) = ATTACK.captures(input) {
                let damage = captures["damage"].parse().ok()?;
                let weapon = match captures["weapon"].to_ascii_lowercase().as_str() {
                    "laser" | "l" => WeaponType::Laser,
                    "missile" | "m" => WeaponType::Missile,
                    "railgun" | "rail" | "r" => WeaponType::Railgun,
                    other => {
                        println!("invalid weapon type {}, choose \"laser\", \"missile\" or \"railgun\"", other);
                        return None;
                    }
                };
                Some(Action::Attack(damage, weapon, parse_tile(&captures)?))
            } else if let Some(captures) = BOARD.captures(input) {
                Some(Action::Board(captures["name"].to_owned(), parse_tile(&captures)?))
            } else if let Some(captures) = TICK.captures(input) {
                Some(Action::Tick(captures["secs"].parse().ok()?))
            } else if let Some(captures) = REPAIR.captures(input) {
                let id = parse_id(&captures)?;
                let amount = match captures.name("amount") {
                    Some(amount) => Some(amount.as_str().parse().ok()?),
                    None if captures["cmd"].eq_ignore_ascii_case("fix") => None,
                    None => {
                        println!("say how much to repair, or use fix for a full repair");
                        return None;
                    }
                };
                Some(Action::Repair(id, amount))
            } else if let Some(captures) = POWER.captures(input) {
                let on = captures["state"].eq_ignore_ascii_case("on");
                Some(Action::Power(parse_id(&captures)?, on))
            } else {
                println!("Invalid combat command \"{}\". Use '?' for help", input);
                None
            },
        })?;

        match action {
            Action::Attack(damage, weapon, tile) => match vessel.take_attack(damage, weapon, tile) {
                Ok(report) => show_report(&report),
                Err(err) => println!("{}", err),
            },
            Action::Board(name, tile) => {
                if let Err(err) = vessel.board(CrewMember::new(name, tile)) {
                    println!("{}", err);
                }
            }
            Action::Tick(secs) => vessel.tick(secs),
            Action::Repair(id, Some(amount)) => match vessel.repair_room(id, amount) {
                Some(restored) => println!("Restored {:.1} hit points on {}.", restored, id),
                None => println!("{} is not a room.", id),
            },
            Action::Repair(id, None) => {
                if vessel.full_repair_room(id) {
                    println!("{} is fully repaired.", id);
                } else {
                    println!("{} is not a room.", id);
                }
            }
            Action::Power(id, on) => {
                if !vessel.set_room_active(id, on) {
                    println!("{} is not a room.", id);
                }
            }
            Action::Stats => {
                show_stats(vessel.stats());
                for contribution in vessel.contribution_trace() {
                    println!("  {:<24} {} stats", contribution.source, contribution.values.len());
                }
            }
            Action::Quit => return Ok(()),
            Action::Help => {
                println!(
                    "Available Commands:
    attack <damage> <weapon> <x>,<y>  hit the vessel. Weapons are \"laser\", \"missile\"
        (splash) and \"railgun\" (extra shield damage).
    board <name> <x>,<y>              bring a crew member aboard, standing inside a room.
    tick <seconds>                    let time pass so the shield recovers and crew heal.
    repair #<id> <amount>             patch up a room. A broken room only reaches its
        breakdown mark this way.
    fix #<id>                         fully repair a room.
    on #<id> | off #<id>              switch a room on or off.
    stats                             show the vessel stats and where they come from.
    quit                              leave."
                );
            }
        }
    }
}

/// Parse the `id` capture as a module id.
fn parse_id(captures: &Captures) -> Option<ModuleId> {
    match captures["id"].parse() {
        Ok(id) => Some(ModuleId::from_raw(id)),
        Err(_) => {
            println!("invalid module id: {}", &captures["id"]);
            None
        }
    }
}

/// Parse the `x` and `y` captures as a tile.
fn parse_tile(captures: &Captures) -> Option<GridCoordinate> {
    let x = match captures["x"].parse() {
        Ok(x) => x,
        Err(_) => {
            println!("invalid x: {}", &captures["x"]);
            return None;
        }
    };
    let y = match captures["y"].parse() {
        Ok(y) => y,
        Err(_) => {
            println!("invalid y: {}", &captures["y"]);
            return None;
        }
    };
    Some(GridCoordinate::new(x, y))
}

fn describe_place(reason: CannotPlaceReason) -> &'static str {
    match reason {
        CannotPlaceReason::UnknownModule => "no such module",
        CannotPlaceReason::OutOfBounds => "not enough space on the grid",
        CannotPlaceReason::Overlap => "overlaps another module",
        CannotPlaceReason::UnsupportedRotation => "that module cannot be rotated",
    }
}

/// Load a saved layout, reporting anything that could not be restored.
fn import(catalog: &DesignCatalog, bounds: GridBounds, path: &str) -> io::Result<Blueprint> {
    let json = fs::read_to_string(path)?;
    let layout = BlueprintLayout::from_json(&json)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    let (blueprint, report) = Blueprint::restore(catalog, bounds, &layout);
    println!("Restored {} modules.", report.restored.len());
    for omitted in &report.omitted {
        println!("  omitted {} (entry {}): {}", omitted.record.design(), omitted.index, omitted.failure);
    }
    Ok(blueprint)
}

/// Place every uncommitted module at a random free position.
fn place_randomly(rng: &mut impl Rng, blueprint: &mut Blueprint) {
    let xs = Uniform::new(0, blueprint.bounds().width() as i32);
    let ys = Uniform::new(0, blueprint.bounds().height() as i32);
    let pending: Vec<_> = blueprint
        .modules()
        .filter(|(id, _)| !blueprint.is_committed(*id))
        .map(|(id, _)| id)
        .collect();
    for id in pending {
        let placed = (0..RANDOM_ATTEMPTS).any(|_| {
            let tile = GridCoordinate::new(rng.sample(xs), rng.sample(ys));
            let rotation = Rotation::ALL[rng.gen_range(0, Rotation::ALL.len())];
            blueprint.commit(id, tile, rotation).is_ok()
        });
        if !placed {
            println!("Could not find room for {}.", id);
        }
    }
}

fn show_modules(blueprint: &Blueprint) {
    if blueprint.is_empty() {
        println!("No modules yet. Add one from the designs list.");
        return;
    }
    println!("Modules:");
    for (id, module) in blueprint.modules() {
        print!("  {:>4} {:<16}", id, module.name());
        match module {
            Module::Room(room) => print!(" level {}", room.level()),
            Module::Weapon(weapon) => print!(" facing {}", DirectionName(weapon.direction())),
        }
        match module.position() {
            Some(tile) if blueprint.is_committed(id) => {
                println!(" at {},{} rotated {}", tile.x, tile.y, module.rotation().degrees())
            }
            _ => println!(" (not placed)"),
        }
    }
}

fn show_designs(catalog: &DesignCatalog) {
    println!("Rooms:");
    for design in catalog.rooms() {
        print!("  {:<16}", design.name);
        for level in &design.levels {
            print!(" [{}x{} cost {}]", level.size.width, level.size.height, level.cost);
        }
        println!();
    }
    println!("Weapons:");
    for design in catalog.weapons() {
        println!(
            "  {:<16} {:?} damage {} cost {}",
            design.name, design.weapon_type, design.damage, design.cost
        );
    }
}

fn show_stats(sheet: &StatSheet) {
    for (stat, value) in sheet.iter() {
        println!("  {:<26} {:>10.1}", format!("{:?}", stat), value);
    }
}

fn show_hull(rng: &mut impl Rng, blueprint: &Blueprint) {
    let plates = blueprint.hull_plates(rng);
    let mut counts = BTreeMap::new();
    for plate in plates.values().flatten() {
        *counts.entry(format!("{:?}", plate.kind())).or_insert(0) += 1;
    }
    println!("Hull plates on {} tiles:", plates.len());
    for (kind, count) in &counts {
        println!("  {:<12} {}", kind, count);
    }
    let variants = plates
        .values()
        .flatten()
        .filter(|plate| plate.kind() == PlateKind::Straight && plate.use_variant())
        .count();
    println!("  {} straight plates use the alternate look", variants);
    match blueprint.hull_tier() {
        Some(tier) => println!(
            "Plating cost at tier {}: {}",
            tier.level(),
            blueprint.hull_plating_cost(&plates)
        ),
        None => println!("No hull tier set; plating is free."),
    }
}

fn show_status(vessel: &Vessel) {
    let shield = vessel.shield();
    println!(
        "Hull {:.1} ({:.0}%)  Shield {:.1}/{:.1}{}  Crew {}  {}",
        vessel.hit_points(),
        vessel.hit_point_percentage() * 100.0,
        shield.current(),
        shield.max(),
        if shield.is_destroyed() {
            format!(" (back in {:.1}s)", shield.respawn_timer())
        } else {
            String::new()
        },
        vessel.crew().len(),
        if vessel.can_warp() { "warp ready" } else { "cannot warp" },
    );
}

fn show_report(report: &AttackReport) {
    println!(
        "Hit for {:.1}: shield took {:.1}{}, {:.1} got through.",
        report.incoming,
        report.shield_absorbed,
        if report.shield_broken { " and broke" } else { "" },
        report.damage
    );
    if let Some(hit) = &report.module {
        println!(
            "  {} lost {:.1} hit points{}",
            hit.module,
            hit.damage,
            match hit.condition {
                DamageCondition::Good => "",
                DamageCondition::Scratch => " and is scratched",
                DamageCondition::Breakdown => " and broke down",
            }
        );
    }
    for hit in &report.crew {
        println!(
            "  {} took {:.1}{}",
            hit.name,
            hit.damage,
            if hit.killed { " and died" } else { "" }
        );
    }
}

/// Every tile that has something to draw.
fn vessel_tiles(vessel: &Vessel) -> impl '_ + Iterator<Item = GridCoordinate> {
    vessel
        .modules()
        .flat_map(|(_, module)| module.occupied_tiles().iter().copied())
}

/// Rectangle of the grid worth printing: the occupied area plus a margin, clipped to the
/// grid.
struct BoardWindow {
    min: GridCoordinate,
    max: GridCoordinate,
}

impl BoardWindow {
    fn around(tiles: impl Iterator<Item = GridCoordinate>, bounds: &GridBounds) -> Self {
        let extent = tiles.fold(None, |extent: Option<(GridCoordinate, GridCoordinate)>, tile| {
            Some(match extent {
                None => (tile, tile),
                Some((min, max)) => (
                    GridCoordinate::new(min.x.min(tile.x), min.y.min(tile.y)),
                    GridCoordinate::new(max.x.max(tile.x), max.y.max(tile.y)),
                ),
            })
        });
        let (min, max) = match extent {
            Some((min, max)) => (min.offset(-VIEW_MARGIN, -VIEW_MARGIN), max.offset(VIEW_MARGIN, VIEW_MARGIN)),
            None => (GridCoordinate::new(0, 0), GridCoordinate::new(9, 9)),
        };
        Self {
            min: GridCoordinate::new(min.x.max(0), min.y.max(0)),
            max: GridCoordinate::new(
                max.x.min(bounds.width() as i32 - 1),
                max.y.min(bounds.height() as i32 - 1),
            ),
        }
    }
}

/// Show part of the grid, top row first. `cell` decides what to draw on each tile.
fn show_board<C: fmt::Display>(window: &BoardWindow, mut cell: impl FnMut(GridCoordinate) -> C) {
    print!("    ");
    for x in window.min.x..=window.max.x {
        print!("{:^4}", x);
    }
    println!();
    for y in (window.min.y..=window.max.y).rev() {
        print!("{:>3} ", y);
        for x in window.min.x..=window.max.x {
            print!("{:^4}", cell(GridCoordinate::new(x, y)));
        }
        println!();
    }
}

enum BuildCell {
    Empty,
    Module(ModuleTag),
}

impl fmt::Display for BuildCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildCell::Empty => f.pad(".."),
            BuildCell::Module(tag) => fmt::Display::fmt(tag, f),
        }
    }
}

enum VesselCell {
    Empty,
    Module(ModuleTag),
    Wreck,
    Crew,
}

impl fmt::Display for VesselCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VesselCell::Empty => f.pad(".."),
            VesselCell::Module(tag) => fmt::Display::fmt(tag, f),
            VesselCell::Wreck => f.pad("xx"),
            VesselCell::Crew => f.pad("@"),
        }
    }
}

/// Display helper that prints a module's id, marking weapons with a `w`.
struct ModuleTag(ModuleId, bool);

impl fmt::Display for ModuleTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = if self.1 {
            format!("w{}", self.0.raw())
        } else {
            self.0.raw().to_string()
        };
        f.pad(&tag)
    }
}

/// Display helper that prints a weapon direction.
struct DirectionName(AttachedDirection);

impl fmt::Display for DirectionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self.0 {
            AttachedDirection::North => "north",
            AttachedDirection::East => "east",
            AttachedDirection::South => "south",
        })
    }
}

/// Install the stderr subscriber, which also picks up records from the `log` facade.
/// Warnings are always shown and each `-v` adds a level. `RUST_LOG` overrides the flags.
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
