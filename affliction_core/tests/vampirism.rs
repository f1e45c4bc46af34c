//! Vampirism driven through the engine against the simulated world.

use affliction_core::{
    notices, register_vampirism, resource, AfflictionEngine, Feeder, RemovalReason, VampirismConfig, BURNING_KEY,
    HUNGER_ACTIVE_KEY, VAMPIRISM_ID,
};
use affliction_core::resource::BLOOD_KEY;
use world_host::{CreatureKind, EffectType, EntityId, GameHost, SimulatedWorld, Weather};

fn vampire(config: &VampirismConfig) -> (AfflictionEngine, SimulatedWorld, EntityId) {
    let engine = AfflictionEngine::with_defaults();
    assert!(register_vampirism(&engine, config).is_some());
    let mut world = SimulatedWorld::new();
    let entity = world.spawn_player("Nosferatu");
    assert!(engine.apply(&mut world, entity, VAMPIRISM_ID, 1));
    (engine, world, entity)
}

fn blood(engine: &AfflictionEngine, entity: EntityId) -> f64 {
    engine.resource_value(entity, VAMPIRISM_ID, BLOOD_KEY).unwrap()
}

fn set_blood(engine: &AfflictionEngine, entity: EntityId, amount: f64) {
    engine.with_instance_mut(entity, VAMPIRISM_ID, |instance| {
        resource::set(instance, BLOOD_KEY, amount, 100.0)
    });
}

#[test]
fn test_new_vampire_starts_half_full() {
    let (engine, _, entity) = vampire(&VampirismConfig::default());
    assert_eq!(blood(&engine, entity), 50.0);
}

#[test]
fn test_vampire_burns_and_bleeds_in_the_sun() {
    let (engine, mut world, entity) = vampire(&VampirismConfig::default());

    engine.tick(&mut world);

    assert!((blood(&engine, entity) - 49.4).abs() < 1e-9);
    assert_eq!(world.health(entity), Some(18.0));
    assert_eq!(world.fire_ticks(entity), 40);
    assert!(engine.instance_view(entity, VAMPIRISM_ID).unwrap().flag(BURNING_KEY));

    engine.tick(&mut world);
    assert_eq!(world.health(entity), Some(16.0));
    assert_eq!(world.notifications_for(entity), vec![notices::SUN_BURNING]);
}

#[test]
fn test_shelter_and_weather_protect() {
    let (engine, mut world, entity) = vampire(&VampirismConfig::default());

    world.weather = Weather::Rain;
    engine.tick(&mut world);
    assert_eq!(world.health(entity), Some(20.0));

    world.weather = Weather::Clear;
    world.entity_mut(entity).unwrap().sky_access = false;
    engine.tick(&mut world);
    assert_eq!(world.health(entity), Some(20.0));
    assert!((blood(&engine, entity) - 49.8).abs() < 1e-9);
    assert!(!engine.instance_view(entity, VAMPIRISM_ID).unwrap().flag(BURNING_KEY));
}

#[test]
fn test_helmet_halves_and_empty_pool_doubles() {
    let (engine, mut world, entity) = vampire(&VampirismConfig::default());

    world.entity_mut(entity).unwrap().equipment.helmet = Some("iron_helmet".to_string());
    engine.tick(&mut world);
    assert_eq!(world.health(entity), Some(19.0));

    world.entity_mut(entity).unwrap().equipment.helmet = None;
    set_blood(&engine, entity, 0.0);
    engine.tick(&mut world);
    assert_eq!(world.health(entity), Some(15.0));
    assert_eq!(blood(&engine, entity), 0.0);
}

#[test]
fn test_starving_vampire_loses_night_bonuses_until_fed() {
    let config = VampirismConfig::from_toml_str(
        r#"
        [blood_hunger]
        enabled = true

        [night_bonus]
        enabled = true
        "#,
    )
    .unwrap();
    let (engine, mut world, entity) = vampire(&config);
    world.set_night(true);
    set_blood(&engine, entity, 5.0);

    engine.tick(&mut world);
    engine.tick(&mut world);

    assert!(world.active_effect(entity, EffectType::Slowness).is_some());
    assert!(world.active_effect(entity, EffectType::Speed).is_none());
    assert!(engine.instance_view(entity, VAMPIRISM_ID).unwrap().flag(HUNGER_ACTIVE_KEY));

    let feeder = Feeder::new(&config.blood);
    assert!(feeder.feed(&engine, &mut world, entity, CreatureKind::Cow, 10.0) > 19.0);

    engine.tick(&mut world);
    engine.tick(&mut world);

    assert!(world.active_effect(entity, EffectType::Slowness).is_none());
    assert!(world.active_effect(entity, EffectType::Speed).is_some());
    assert!(world.active_effect(entity, EffectType::NightVision).is_some());

    let notes = world.notifications_for(entity);
    assert!(notes.contains(&notices::HUNGER_START));
    assert!(notes.contains(&notices::HUNGER_END));
    assert!(notes.contains(&notices::FEEDING));

    assert!(engine.remove(&mut world, entity, VAMPIRISM_ID, RemovalReason::Cured));
    assert!(world.active_effect(entity, EffectType::Speed).is_none());
    assert!(world.active_effect(entity, EffectType::NightVision).is_none());
}

#[test]
fn test_mortals_cannot_feed() {
    let (engine, mut world, _) = vampire(&VampirismConfig::default());
    let mortal = world.spawn_player("Van Helsing");
    let feeder = Feeder::new(&VampirismConfig::default().blood);

    assert_eq!(feeder.feed(&engine, &mut world, mortal, CreatureKind::Cow, 10.0), 0.0);
    assert!(!engine.has(mortal, VAMPIRISM_ID));
}

#[test]
fn test_disabled_vampirism_is_not_registered() {
    let engine = AfflictionEngine::with_defaults();
    let config = VampirismConfig::from_toml_str("enabled = false").unwrap();
    assert!(register_vampirism(&engine, &config).is_none());
    assert!(!engine.registry().is_registered(VAMPIRISM_ID));
}
