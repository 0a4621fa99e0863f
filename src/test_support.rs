//! Byte-buffer fixtures shared by tests across the crate: a minimal but
//! fully valid SF2 file with exactly one preset/instrument/sample.

fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(id);
    bytes.extend_from_slice(&(body.len() as i32).to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn padded_name(name: &str) -> [u8; 20] {
    let mut buf = [0_u8; 20];
    buf[..name.len()].copy_from_slice(name.as_bytes());
    buf
}

fn pgen_record(generator_type: u16, value: i16) -> [u8; 4] {
    let mut buf = [0_u8; 4];
    buf[0..2].copy_from_slice(&generator_type.to_le_bytes());
    buf[2..4].copy_from_slice(&value.to_le_bytes());
    buf
}

/// Builds a complete `RIFF`/`sfbk` byte buffer with one preset ("Piano")
/// pointing at one instrument ("Piano-C4") pointing at one mono sample
/// ("C4"), covering the whole MIDI key/velocity range.
pub(crate) fn minimal_sf2() -> Vec<u8> {
    const GEN_INSTRUMENT: u16 = 41;
    const GEN_SAMPLE_ID: u16 = 53;

    let mut info_body = Vec::new();
    info_body.extend_from_slice(b"INFO");
    info_body.extend(chunk(b"ifil", &[2, 0, 0, 0]));
    info_body.extend(chunk(b"INAM", b"Test Bank\0"));
    let info = chunk(b"LIST", &info_body);

    let mut sdta_body = Vec::new();
    sdta_body.extend_from_slice(b"sdta");
    let samples: [i16; 4] = [0, 8192, 0, -8192];
    let mut smpl = Vec::new();
    for s in samples {
        smpl.extend_from_slice(&s.to_le_bytes());
    }
    sdta_body.extend(chunk(b"smpl", &smpl));
    let sdta = chunk(b"LIST", &sdta_body);

    let mut pdta_body = Vec::new();
    pdta_body.extend_from_slice(b"pdta");

    let mut phdr = Vec::new();
    for (name, bag) in [("Piano", 0_u16), ("EOP", 1)] {
        phdr.extend_from_slice(&padded_name(name));
        phdr.extend_from_slice(&0_u16.to_le_bytes()); // patch
        phdr.extend_from_slice(&0_u16.to_le_bytes()); // bank
        phdr.extend_from_slice(&bag.to_le_bytes());
        phdr.extend_from_slice(&0_i32.to_le_bytes());
        phdr.extend_from_slice(&0_i32.to_le_bytes());
        phdr.extend_from_slice(&0_i32.to_le_bytes());
    }
    pdta_body.extend(chunk(b"phdr", &phdr));

    let mut pbag = Vec::new();
    for gen_index in [0_u16, 1] {
        pbag.extend_from_slice(&gen_index.to_le_bytes());
        pbag.extend_from_slice(&0_u16.to_le_bytes());
    }
    pdta_body.extend(chunk(b"pbag", &pbag));
    pdta_body.extend(chunk(b"pmod", &[]));

    let pgen = pgen_record(GEN_INSTRUMENT, 0);
    pdta_body.extend(chunk(b"pgen", &pgen));

    let mut inst = Vec::new();
    for (name, bag) in [("Piano-C4", 0_u16), ("EOI", 1)] {
        inst.extend_from_slice(&padded_name(name));
        inst.extend_from_slice(&bag.to_le_bytes());
    }
    pdta_body.extend(chunk(b"inst", &inst));

    let mut ibag = Vec::new();
    for gen_index in [0_u16, 1] {
        ibag.extend_from_slice(&gen_index.to_le_bytes());
        ibag.extend_from_slice(&0_u16.to_le_bytes());
    }
    pdta_body.extend(chunk(b"ibag", &ibag));
    pdta_body.extend(chunk(b"imod", &[]));

    let igen = pgen_record(GEN_SAMPLE_ID, 0);
    pdta_body.extend(chunk(b"igen", &igen));

    let mut shdr = Vec::new();
    let mut record = Vec::new();
    record.extend_from_slice(&padded_name("C4"));
    record.extend_from_slice(&0_u32.to_le_bytes()); // start
    record.extend_from_slice(&4_u32.to_le_bytes()); // end
    record.extend_from_slice(&0_u32.to_le_bytes()); // start_loop
    record.extend_from_slice(&4_u32.to_le_bytes()); // end_loop
    record.extend_from_slice(&44100_u32.to_le_bytes());
    record.push(60); // original_pitch
    record.push(0); // pitch_correction
    record.extend_from_slice(&0_u16.to_le_bytes()); // link
    record.extend_from_slice(&1_u16.to_le_bytes()); // sample_type: mono
    shdr.extend_from_slice(&record);
    shdr.extend_from_slice(&[0_u8; 46]); // terminator record
    pdta_body.extend(chunk(b"shdr", &shdr));

    let pdta = chunk(b"LIST", &pdta_body);

    let mut riff_body = Vec::new();
    riff_body.extend_from_slice(b"sfbk");
    riff_body.extend_from_slice(&info);
    riff_body.extend_from_slice(&sdta);
    riff_body.extend_from_slice(&pdta);

    chunk(b"RIFF", &riff_body)
}
