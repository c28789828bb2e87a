//! Settings Tests
//!
//! Tests the shadow-state setters: no-op detection, minimal write windows,
//! clamping, staged commits and precondition errors.
//! Run with: cargo test --test settings_tests

mod common;

use common::{powered_rig, rig};
use si470x_firmware::drivers::si470x::registers::{Field, Register, RegisterFile};
use si470x_firmware::radio::settings::{
    apply_all, native_to_volume_level, volume_level_to_native, TunerSettings,
};
use si470x_firmware::types::{
    RegionConfig, SeekDirection, SeekSensitivity, SoftmuteAttenuation, SoftmuteRate,
};
use si470x_firmware::Error;

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn construction_defaults() {
    let (radio, rig) = rig();
    assert!(radio.mute());
    assert!(radio.softmute());
    assert!(!radio.mono());
    assert_eq!(radio.volume(), 0);
    assert!(!radio.volume_extended());
    assert_eq!(radio.seek_sensitivity(), SeekSensitivity::Recommended);
    assert_eq!(radio.softmute_rate(), SoftmuteRate::Fastest);
    assert_eq!(radio.softmute_attenuation(), SoftmuteAttenuation::Db16);
    assert_eq!(radio.config(), RegionConfig::usa());
    assert_eq!(radio.frequency(), None);
    assert!(!radio.has_task());
    assert_eq!(rig.transactions(), 0);
}

// =============================================================================
// Write Windows
// =============================================================================

#[test]
fn mute_writes_powercfg_only() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    radio.set_mute(false).unwrap();

    let chip = rig.chip.borrow();
    assert_eq!(chip.writes.len(), 1);
    assert_eq!(chip.writes[0].len(), 1);
    assert!(radio.registers().flag(Field::DMUTE));
    assert!(!radio.mute());
}

#[test]
fn repeated_setter_is_free() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    radio.set_mute(false).unwrap();
    radio.set_mute(false).unwrap();
    assert_eq!(rig.transactions(), 1);

    // Power-on defaults already match
    radio.set_softmute(true).unwrap();
    radio.set_mono(false).unwrap();
    radio.set_seek_sensitivity(SeekSensitivity::Recommended).unwrap();
    radio.set_softmute_rate(SoftmuteRate::Fastest).unwrap();
    radio.set_softmute_attenuation(SoftmuteAttenuation::Db16).unwrap();
    radio.set_volume(0, false).unwrap();
    assert_eq!(rig.transactions(), 1);
}

#[test]
fn sysconfig3_settings_write_five_words() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    radio.set_softmute_rate(SoftmuteRate::Slowest).unwrap();
    radio.set_softmute_attenuation(SoftmuteAttenuation::Db10).unwrap();
    radio.set_seek_sensitivity(SeekSensitivity::Most).unwrap();
    radio.set_volume(7, false).unwrap();

    let chip = rig.chip.borrow();
    assert_eq!(chip.writes.len(), 4);
    assert!(chip.writes.iter().all(|w| w.len() == 5));
    assert_eq!(chip.regs[6] >> 14, 3);
    assert_eq!((chip.regs[6] >> 12) & 0x3, 3);
    assert_eq!(chip.regs[5] & 0xF, 7);
}

#[test]
fn softmute_and_mono_bits() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    radio.set_softmute(false).unwrap();
    radio.set_mono(true).unwrap();
    let powercfg = rig.chip.borrow().regs[2];
    assert_ne!(powercfg & (1 << 15), 0, "DSMUTE set when softmute off");
    assert_ne!(powercfg & (1 << 13), 0, "MONO set");
}

#[test]
fn seek_sensitivity_table() {
    let (mut radio, _rig) = powered_rig(RegionConfig::usa());
    let cases = [
        (SeekSensitivity::StrongOnly, 0x0C, 7, 0xF),
        (SeekSensitivity::More, 0x0C, 4, 8),
        (SeekSensitivity::Most, 0x00, 4, 0xF),
        (SeekSensitivity::Recommended, 0x19, 4, 8),
    ];
    for (sensitivity, seekth, sksnr, skcnt) in cases {
        radio.set_seek_sensitivity(sensitivity).unwrap();
        let regs = radio.registers();
        assert_eq!(regs.field(Field::SEEKTH), seekth, "{sensitivity:?}");
        assert_eq!(regs.field(Field::SKSNR), sksnr, "{sensitivity:?}");
        assert_eq!(regs.field(Field::SKCNT), skcnt, "{sensitivity:?}");
    }
}

// =============================================================================
// Volume
// =============================================================================

#[test]
fn volume_clamps_to_fifteen() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    radio.set_volume(40, false).unwrap();
    assert_eq!(radio.volume(), 15);
    assert_eq!(rig.chip.borrow().regs[5] & 0xF, 15);
    // native 15 without VOLEXT is the loudest step of the continuous scale
    assert_eq!(radio.volume_level(), 30);
}

#[test]
fn volume_level_scale() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());

    radio.set_volume_level(15).unwrap();
    assert_eq!((radio.volume(), radio.volume_extended()), (15, true));
    assert_ne!(rig.chip.borrow().regs[6] & (1 << 8), 0);

    radio.set_volume_level(16).unwrap();
    assert_eq!((radio.volume(), radio.volume_extended()), (1, false));
    assert_eq!(radio.volume_level(), 16);

    radio.set_volume_level(30).unwrap();
    assert_eq!(radio.volume_level(), 30);

    radio.set_volume_level(200).unwrap();
    assert_eq!(radio.volume_level(), 30);

    radio.set_volume_level(0).unwrap();
    assert_eq!(radio.volume_level(), 0);
}

#[test]
fn volume_level_mapping_is_a_bijection() {
    for level in 0..=30u8 {
        let (native, ext) = volume_level_to_native(level);
        assert!(native <= 15);
        assert_eq!(native_to_volume_level(native, ext), level);
    }
}

// =============================================================================
// Staged Commit
// =============================================================================

#[test]
fn failed_write_changes_nothing() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    let before = *radio.registers();
    rig.chip.borrow_mut().fail_writes = 1;

    assert!(matches!(radio.set_volume(9, false), Err(Error::I2c(_))));
    assert_eq!(radio.volume(), 0);
    assert_eq!(*radio.registers(), before);

    radio.set_volume(9, false).unwrap();
    assert_eq!(radio.volume(), 9);
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn setters_require_power() {
    let (mut radio, rig) = rig();
    assert_eq!(radio.set_mute(false), Err(Error::NotPoweredUp));
    assert_eq!(radio.set_volume(3, false), Err(Error::NotPoweredUp));
    assert_eq!(radio.rssi(), Err(Error::NotPoweredUp));
    assert_eq!(radio.stereo_indicator(), Err(Error::NotPoweredUp));
    assert_eq!(rig.transactions(), 0);
}

#[test]
fn setters_refuse_during_task() {
    let (mut radio, _rig) = powered_rig(RegionConfig::usa());
    radio.seek_async(SeekDirection::Up).unwrap();
    assert_eq!(radio.set_mono(true), Err(Error::TaskPending));
    assert_eq!(radio.set_volume_level(10), Err(Error::TaskPending));
    assert_eq!(
        radio.seek_async(SeekDirection::Down),
        Err(Error::TaskPending)
    );
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn status_reads_one_word() {
    let (mut radio, rig) = powered_rig(RegionConfig::usa());
    rig.chip.borrow_mut().rssi = 52;
    rig.chip.borrow_mut().stereo = false;
    assert_eq!(radio.rssi().unwrap(), 52);
    assert!(!radio.stereo_indicator().unwrap());
    assert_eq!(rig.chip.borrow().reads, vec![1, 1]);
}

// =============================================================================
// Batch Encoding
// =============================================================================

#[test]
fn apply_all_encodes_every_setting() {
    let mut settings = TunerSettings::new();
    settings.mute = false;
    settings.mono = true;
    settings.volume = 12;
    settings.volume_extended = true;
    settings.softmute_rate = SoftmuteRate::Slow;

    let mut regs = RegisterFile::new();
    apply_all(&mut regs, &settings, &RegionConfig::japan(), true);

    assert!(regs.flag(Field::DMUTE));
    assert!(regs.flag(Field::MONO));
    assert!(!regs.flag(Field::DSMUTE));
    assert!(regs.flag(Field::RDS));
    assert!(regs.flag(Field::DE));
    assert_eq!(regs.field(Field::BAND), 2);
    assert_eq!(regs.field(Field::SPACE), 1);
    assert_eq!(regs.field(Field::VOLUME), 12);
    assert!(regs.flag(Field::VOLEXT));
    assert_eq!(regs.field(Field::SMUTER), 2);
    assert_eq!(regs.field(Field::SEEKTH), 0x19);
    assert_eq!(regs.get(Register::Test1), 0);
}
