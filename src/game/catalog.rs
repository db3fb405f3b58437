//! Resolved entity blueprints
//!
//! Templates in `GameConfig` reference sheets and each other by name. The
//! catalog resolves every reference once, up front, and validates the numbers
//! that would otherwise only misbehave mid-game. Constructors then take a
//! blueprint and never look anything up.

use std::rc::Rc;

use crate::config::{
    CreatureTemplate, DebrisTemplate, DurationSpec, GameConfig, ParticleTemplate,
    ProjectileTemplate,
};
use crate::error::ConfigError;
use crate::sim::{SheetRegistry, SpriteSheet};

#[derive(Debug, Clone)]
pub struct AttackBlueprint {
    pub projectile: Rc<ProjectileBlueprint>,
    pub cooldown: u32,
}

#[derive(Debug, Clone)]
pub struct CreatureBlueprint {
    pub name: String,
    pub sheet: Rc<SpriteSheet>,
    pub template: CreatureTemplate,
    pub attack: Option<AttackBlueprint>,
    pub blood: Option<Rc<ParticleBlueprint>>,
}

#[derive(Debug, Clone)]
pub struct ProjectileBlueprint {
    pub name: String,
    pub sheet: Rc<SpriteSheet>,
    pub template: ProjectileTemplate,
}

#[derive(Debug, Clone)]
pub struct ParticleBlueprint {
    pub name: String,
    pub sheet: Rc<SpriteSheet>,
    pub template: ParticleTemplate,
    pub debris: Option<Rc<DebrisBlueprint>>,
}

#[derive(Debug, Clone)]
pub struct DebrisBlueprint {
    pub name: String,
    pub sheet: Rc<SpriteSheet>,
    pub template: DebrisTemplate,
}

/// Everything the gameplay view needs, resolved from one configuration
#[derive(Debug)]
pub struct Catalog {
    pub sheets: SheetRegistry,
    pub background: Option<Rc<SpriteSheet>>,
    pub player: Rc<CreatureBlueprint>,
    pub monster: Rc<CreatureBlueprint>,
}

impl Catalog {
    pub fn resolve(config: &GameConfig) -> Result<Self, ConfigError> {
        let sheets = SheetRegistry::from_config(config);
        let background = config
            .background
            .as_deref()
            .map(|name| sheets.get(name))
            .transpose()?;
        let player = Rc::new(resolve_creature(config, &sheets, &config.player)?);
        let monster = Rc::new(resolve_creature(config, &sheets, &config.monster)?);
        log::debug!(
            "Catalog resolved: {} sheets, player {}, monster {}",
            sheets.len(),
            player.name,
            monster.name
        );
        Ok(Self {
            sheets,
            background,
            player,
            monster,
        })
    }
}

fn resolve_creature(
    config: &GameConfig,
    sheets: &SheetRegistry,
    name: &str,
) -> Result<CreatureBlueprint, ConfigError> {
    let template = config.creature(name)?;
    check_radius(name, template.hit_circle_radius)?;
    check_breakpoints(name, &template.move_animation_breakpoints)?;
    check_finite(name, "move_speed", template.move_speed)?;
    if template.health == 0 {
        return Err(invalid(name, "health must be at least 1"));
    }

    let attack = template
        .attack
        .as_ref()
        .map(|attack| -> Result<AttackBlueprint, ConfigError> {
            Ok(AttackBlueprint {
                projectile: Rc::new(resolve_projectile(config, sheets, &attack.projectile)?),
                cooldown: attack.cooldown,
            })
        })
        .transpose()?;
    let blood = template
        .blood
        .as_deref()
        .map(|blood| resolve_particle(config, sheets, blood).map(Rc::new))
        .transpose()?;

    Ok(CreatureBlueprint {
        name: name.to_string(),
        sheet: sheets.get(&template.sprite_sheet)?,
        template: template.clone(),
        attack,
        blood,
    })
}

fn resolve_projectile(
    config: &GameConfig,
    sheets: &SheetRegistry,
    name: &str,
) -> Result<ProjectileBlueprint, ConfigError> {
    let template = config.projectile(name)?;
    check_radius(name, template.hit_circle_radius)?;
    check_breakpoints(name, &template.move_animation_breakpoints)?;
    check_finite(name, "move_speed", template.move_speed)?;
    check_finite(name, "thrust", template.thrust)?;
    if !(template.accuracy >= 0.0 && template.accuracy.is_finite()) {
        return Err(invalid(name, "accuracy must be a finite, non-negative angle"));
    }
    if let Some(duration) = &template.duration {
        check_duration(name, duration)?;
    }
    Ok(ProjectileBlueprint {
        name: name.to_string(),
        sheet: sheets.get(&template.sprite_sheet)?,
        template: template.clone(),
    })
}

fn resolve_particle(
    config: &GameConfig,
    sheets: &SheetRegistry,
    name: &str,
) -> Result<ParticleBlueprint, ConfigError> {
    let template = config.particle(name)?;
    check_radius(name, template.hit_circle_radius)?;
    check_breakpoints(name, &template.move_animation_breakpoints)?;
    check_finite(name, "move_speed", template.move_speed)?;
    if !(template.move_speed_offset >= 0.0 && template.move_speed_offset.is_finite()) {
        return Err(invalid(name, "move_speed_offset must be finite and non-negative"));
    }
    if let Some(duration) = &template.duration {
        check_duration(name, duration)?;
    }
    let debris = template
        .debris
        .as_deref()
        .map(|debris| resolve_debris(config, sheets, debris).map(Rc::new))
        .transpose()?;
    Ok(ParticleBlueprint {
        name: name.to_string(),
        sheet: sheets.get(&template.sprite_sheet)?,
        template: template.clone(),
        debris,
    })
}

fn resolve_debris(
    config: &GameConfig,
    sheets: &SheetRegistry,
    name: &str,
) -> Result<DebrisBlueprint, ConfigError> {
    let template = config.debris_template(name)?;
    let [x, y] = template.sprite_choice_range;
    if x == 0 || y == 0 {
        return Err(invalid(name, "sprite_choice_range must be non-zero on both axes"));
    }
    check_duration(name, &template.duration)?;
    Ok(DebrisBlueprint {
        name: name.to_string(),
        sheet: sheets.get(&template.sprite_sheet)?,
        template: template.clone(),
    })
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidTemplate {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn check_finite(name: &str, field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, &format!("{field} must be finite")))
    }
}

fn check_radius(name: &str, radius: f32) -> Result<(), ConfigError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, "hit_circle_radius must be finite and non-negative"))
    }
}

fn check_breakpoints(name: &str, breakpoints: &[u32; 4]) -> Result<(), ConfigError> {
    if breakpoints.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    } else {
        Err(invalid(name, "move_animation_breakpoints must be non-decreasing"))
    }
}

fn check_duration(name: &str, duration: &DurationSpec) -> Result<(), ConfigError> {
    match *duration {
        DurationSpec::Fixed(ticks) if ticks.is_finite() => Ok(()),
        DurationSpec::Range { min, max } if min.is_finite() && max.is_finite() && min <= max => {
            Ok(())
        }
        _ => Err(invalid(name, "duration must be finite with min <= max")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttackTemplate;

    #[test]
    fn test_default_catalog_resolves() {
        let catalog = Catalog::resolve(&GameConfig::default()).unwrap();
        assert_eq!(catalog.player.name, "PLAYER");
        assert_eq!(catalog.monster.sheet.name(), "zombie1");
        assert!(catalog.background.is_some());

        let attack = catalog.player.attack.as_ref().unwrap();
        assert_eq!(attack.projectile.name, "GREEN_LASER");
        assert_eq!(attack.cooldown, 3);

        let blood = catalog.monster.blood.as_ref().unwrap();
        assert_eq!(blood.debris.as_ref().unwrap().name, "BLOOD_STAIN");
    }

    #[test]
    fn test_missing_references_are_fatal() {
        let mut config = GameConfig::default();
        config.monster = "DRAGON".into();
        assert!(matches!(
            Catalog::resolve(&config),
            Err(ConfigError::UnknownTemplate { kind: "creature", .. })
        ));

        let mut config = GameConfig::default();
        if let Some(player) = config.creatures.get_mut("PLAYER") {
            player.attack = Some(AttackTemplate {
                projectile: "RAILGUN".into(),
                cooldown: 1,
            });
        }
        assert!(matches!(
            Catalog::resolve(&config),
            Err(ConfigError::UnknownTemplate { kind: "projectile", .. })
        ));

        let mut config = GameConfig::default();
        config.sheets.remove("blood_stain");
        assert!(matches!(
            Catalog::resolve(&config),
            Err(ConfigError::UnknownSheet(sheet)) if sheet == "blood_stain"
        ));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let mut config = GameConfig::default();
        if let Some(laser) = config.projectiles.get_mut("GREEN_LASER") {
            laser.duration = Some(DurationSpec::Range { min: 10.0, max: 5.0 });
        }
        assert!(matches!(
            Catalog::resolve(&config),
            Err(ConfigError::InvalidTemplate { name, .. }) if name == "GREEN_LASER"
        ));

        let mut config = GameConfig::default();
        if let Some(zombie) = config.creatures.get_mut("ZOMBIE_1") {
            zombie.move_animation_breakpoints = [15, 10, 45, 60];
        }
        assert!(Catalog::resolve(&config).is_err());

        let mut config = GameConfig::default();
        if let Some(stain) = config.debris.get_mut("BLOOD_STAIN") {
            stain.sprite_choice_range = [0, 2];
        }
        assert!(Catalog::resolve(&config).is_err());
    }

    #[test]
    fn test_no_background() {
        let config = GameConfig {
            background: None,
            ..Default::default()
        };
        assert!(Catalog::resolve(&config).unwrap().background.is_none());
    }
}
