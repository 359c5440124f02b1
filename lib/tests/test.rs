use rand::{rngs::StdRng, SeedableRng};
use std::error::Error;
use torlife_lib::{run, Config, Error as LifeError, Grid, Rule, RuleError, Simulation, Status, ALIVE};

fn horizontal_blinker() -> Result<Grid, LifeError> {
    Grid::from_rows(&[
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ])
}

/// Recomputes one step cell by cell from the previous grid.
fn step_naive(grid: &Grid, rule: &Rule) -> Result<Grid, LifeError> {
    let size = grid.size();
    let mut next = Grid::dead(size)?;
    for y in 0..size {
        for x in 0..size {
            let count = grid.alive_neighbors((x, y))?;
            let state = grid.get_cell((x, y))?;
            next.set_cell((x, y), rule.next_state(state, count))?;
        }
    }
    Ok(next)
}

#[test]
fn single_cell_dies() -> Result<(), Box<dyn Error>> {
    let grid = Grid::from_rows(&[[0, 0, 0], [0, 1, 0], [0, 0, 0]])?;
    let (grids, stable) = run(grid, 2, Rule::conway())?;
    assert_eq!(grids.len(), 2);
    assert_eq!(grids[1], Grid::dead(3)?);
    assert_eq!(stable, vec![false]);
    Ok(())
}

#[test]
fn blinker() -> Result<(), Box<dyn Error>> {
    let initial = horizontal_blinker()?;
    let (grids, stable) = run(initial.clone(), 3, Rule::conway())?;
    let vertical = Grid::from_rows(&[
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0],
    ])?;
    assert_eq!(grids, vec![initial.clone(), vertical, initial]);
    assert_eq!(stable, vec![false, false]);
    Ok(())
}

#[test]
fn blinker_on_3x3_torus() -> Result<(), Box<dyn Error>> {
    // On a 3x3 torus every cell sees the whole row of the blinker,
    // so it fills the grid and then dies out.
    let grid = Grid::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 0, 0]])?;
    let (grids, stable) = run(grid, 4, Rule::conway())?;
    assert_eq!(grids[1].population(), 9);
    assert_eq!(grids[2], Grid::dead(3)?);
    assert_eq!(stable, vec![false, false, true]);
    Ok(())
}

#[test]
fn all_dead() -> Result<(), Box<dyn Error>> {
    let dead = Grid::dead(6)?;
    for rule in [Rule::conway(), "B36/S23".parse()?, Rule::new([2], 0, 8)?] {
        let (grids, stable) = run(dead.clone(), 5, rule)?;
        assert_eq!(grids, vec![dead.clone(); 5]);
        assert_eq!(stable, vec![true; 4]);
    }
    Ok(())
}

#[test]
fn duration_one() -> Result<(), Box<dyn Error>> {
    let initial = horizontal_blinker()?;
    let (grids, stable) = run(initial.clone(), 1, Rule::conway())?;
    assert_eq!(grids, vec![initial]);
    assert!(stable.is_empty());
    Ok(())
}

#[test]
fn invalid_duration() -> Result<(), Box<dyn Error>> {
    for duration in [0, -3] {
        assert_eq!(
            run(horizontal_blinker()?, duration, Rule::conway()),
            Err(LifeError::InvalidDuration(duration))
        );
    }
    Ok(())
}

#[test]
fn invalid_rule() {
    assert_eq!(
        Rule::new([3], 3, 2),
        Err(RuleError::EmptySurvival { min: 3, max: 2 })
    );
}

#[test]
fn invalid_rule_string() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        "B3/S2467".parse::<Rule>(),
        Err(LifeError::InvalidRule(RuleError::NonContiguousSurvival(vec![2, 4, 6, 7])))
    );
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn invalid_rule_from_config() {
    let json = r#"{"duration": 5, "rule": {"birth": [3], "survive": {"min": 3, "max": 2}}}"#;
    let message = serde_json::from_str::<Config>(json).map(|_| ()).unwrap_err().to_string();
    assert!(message.contains(&RuleError::EmptySurvival { min: 3, max: 2 }.to_string()));
    let json = r#"{"duration": 5, "rule": {"birth": [], "survive": {"min": 2, "max": 3}}}"#;
    let message = serde_json::from_str::<Config>(json).map(|_| ()).unwrap_err().to_string();
    assert!(message.contains(&RuleError::EmptyBirth.to_string()));
    let json = r#"{"rule": {"birth": [3], "survive": {"min": -1, "max": 2}}}"#;
    let message = serde_json::from_str::<Config>(json).map(|_| ()).unwrap_err().to_string();
    assert!(message.contains(&RuleError::NegativeCount(-1).to_string()));
}

#[cfg(feature = "serde")]
#[test]
fn config_from_json() -> Result<(), Box<dyn Error>> {
    let json = r#"{"duration": 3, "rule": {"birth": [3, 6], "survive": {"min": 2, "max": 3}}}"#;
    let config: Config = serde_json::from_str(json)?;
    assert_eq!(config.duration, 3);
    assert_eq!(config.rule, "B36/S23".parse::<Rule>()?);
    let history = config.run(horizontal_blinker()?)?;
    assert_eq!(history.len(), 3);
    assert_eq!(history.grids()[2], horizontal_blinker()?);
    Ok(())
}

#[test]
fn nonzero_is_alive() -> Result<(), Box<dyn Error>> {
    let values = Grid::from_rows(&[[0.0, 0.7, 0.0], [0.0, -2.0, 0.0], [0.0, 1.0, 0.0]])?;
    let binary = Grid::from_rows(&[[0, 1, 0], [0, 1, 0], [0, 1, 0]])?;
    assert_eq!(values, binary);
    let (grids, _) = run(values, 2, Rule::conway())?;
    assert_eq!(grids[0], binary);
    Ok(())
}

#[test]
fn corner_neighbors() -> Result<(), Box<dyn Error>> {
    let mut grid = Grid::dead(4)?;
    grid.set_cell((3, 3), ALIVE)?;
    grid.set_cell((3, 0), ALIVE)?;
    grid.set_cell((0, 3), ALIVE)?;
    assert_eq!(grid.alive_neighbors((0, 0))?, 3);
    // Three neighbors across the corner: the dead corner is born.
    let (grids, _) = run(grid, 2, Rule::conway())?;
    assert_eq!(grids[1].get_cell((0, 0))?, ALIVE);
    Ok(())
}

#[test]
fn steps_match_naive() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(2024);
    let rules = [
        Rule::conway(),
        "B36/S23".parse()?,
        "B3678/S345678".parse()?,
        Rule::new([2], 1, 1)?,
    ];
    for rule in rules {
        let initial = Grid::random(12, 0.35, &mut rng)?;
        let (grids, stable) = run(initial, 8, rule.clone())?;
        for (i, pair) in grids.windows(2).enumerate() {
            assert_eq!(pair[0].size(), pair[1].size());
            assert_eq!(pair[1], step_naive(&pair[0], &rule)?);
            assert_eq!(stable[i], pair[0] == pair[1]);
        }
    }
    Ok(())
}

#[test]
fn stable_stays_stable() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(11);
    let initial = Grid::random(10, 0.3, &mut rng)?;
    let (_, stable) = run(initial, 60, Rule::conway())?;
    if let Some(first) = stable.iter().position(|&s| s) {
        assert!(stable[first..].iter().all(|&s| s));
    }
    Ok(())
}

#[test]
fn resume() -> Result<(), Box<dyn Error>> {
    let mut simulation = Simulation::new(horizontal_blinker()?, 5, Rule::conway())?;
    assert_eq!(simulation.advance(Some(1)), Status::Paused);
    let partial = simulation.history().clone();
    assert_eq!(partial.len(), 2);
    assert_eq!(simulation.advance(None), Status::Finished);
    let (grids, stable) = simulation.into_history().into_parts();
    assert_eq!(&grids[..2], partial.grids());
    assert_eq!(stable, vec![false; 4]);
    Ok(())
}
