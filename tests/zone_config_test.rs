use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use date_helper::{
    ConfigProvider, DateHelper, FixedClock, LegacyInstant, LocalZone, TomlConfig,
};
use date_helper::utils::validation::Validate;
use std::io::Write;
use tempfile::NamedTempFile;

/// 固定時區下 instant -> civil -> instant 應該完全還原
#[test]
fn test_conversion_round_trip_in_fixed_zone() -> Result<()> {
    for offset in ["+00:00", "+05:45", "-09:30", "+14:00"] {
        let zone: LocalZone = offset.parse()?;
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        let helper = DateHelper::new(FixedClock::new(epoch), zone);

        for millis in [0_i64, 1_710_930_600_123, -86_400_001, 4_102_444_799_999] {
            let instant = LegacyInstant::from_epoch_millis(millis).unwrap();
            let civil = helper.to_civil(Some(instant));
            assert_eq!(helper.from_civil(civil.as_ref())?, Some(instant));
        }
    }
    Ok(())
}

#[test]
fn test_system_zone_round_trip() -> Result<()> {
    let helper = DateHelper::system();
    let instant = LegacyInstant::from_epoch_millis(1_710_930_600_000).unwrap();
    let civil = helper.to_civil(Some(instant));
    assert_eq!(helper.from_civil(civil.as_ref())?, Some(instant));
    Ok(())
}

#[test]
fn test_helper_from_config_file() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(
        br#"
[defaults]
pattern = "dd.MM.yyyy HH:mm"

[zone]
offset = "-03:00"
"#,
    )?;

    let config = TomlConfig::from_file(temp_file.path())?;
    config.validate()?;
    assert_eq!(config.pattern(), "dd.MM.yyyy HH:mm");

    let helper = DateHelper::from_config(&config)?;
    assert_eq!(
        helper.zone(),
        LocalZone::Fixed(FixedOffset::west_opt(3 * 3600).unwrap())
    );

    let civil = NaiveDate::from_ymd_opt(2024, 3, 20)
        .unwrap()
        .and_hms_opt(7, 30, 0)
        .unwrap();
    let instant = helper.from_civil(Some(&civil))?.unwrap();
    assert_eq!(instant.to_string(), "2024-03-20T10:30:00.000Z");

    let text = date_helper::format(Some(&civil), config.pattern())?;
    assert_eq!(text.as_deref(), Some("20.03.2024 07:30"));
    Ok(())
}

#[test]
fn test_now_follows_injected_clock() {
    let at = DateTime::from_timestamp(1_710_892_799, 0).unwrap();
    let utc = DateHelper::new(FixedClock::new(at), "UTC".parse().unwrap());
    let tokyo = DateHelper::new(FixedClock::new(at), "+09:00".parse().unwrap());

    assert_eq!(
        utc.now_date(),
        NaiveDate::from_ymd_opt(2024, 3, 19).unwrap()
    );
    assert_eq!(
        tokyo.now_date(),
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    );
    assert_eq!(utc.now_instant(), tokyo.now_instant());
}
