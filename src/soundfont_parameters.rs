use std::io::Read;

use crate::binary_reader::BinaryReader;
use crate::error::SoundFontError;
use crate::generator::Generator;
use crate::instrument::{Instrument, InstrumentInfo};
use crate::preset::{Preset, PresetInfo};
use crate::read_counter::ReadCounter;
use crate::sample_header::SampleHeader;
use crate::zone::Zone;

/// The `pdta` sub-list: raw preset/instrument/zone/generator records, from
/// which [`Preset`]s and [`Instrument`]s are assembled.
pub(crate) struct SoundFontParameters {
    pub(crate) sample_headers: Vec<SampleHeader>,
    pub(crate) instruments: Vec<Instrument>,
    pub(crate) presets: Vec<Preset>,
}

impl SoundFontParameters {
    pub(crate) fn new<R: Read>(reader: &mut R) -> Result<Self, SoundFontError> {
        let chunk_id = BinaryReader::read_four_cc(reader)?;
        if chunk_id != "LIST" {
            return Err(SoundFontError::ListChunkNotFound);
        }

        let end = BinaryReader::read_i32(reader)? as usize;
        let reader = &mut ReadCounter::new(reader);

        let list_type = BinaryReader::read_four_cc(reader)?;
        if list_type != "pdta" {
            return Err(SoundFontError::InvalidListChunkType {
                expected: "pdta".into(),
                actual: list_type,
            });
        }

        let mut preset_infos: Option<Vec<PresetInfo>> = None;
        let mut preset_bag: Option<Vec<u16>> = None;
        let mut preset_generators: Option<Vec<Generator>> = None;
        let mut instrument_infos: Option<Vec<InstrumentInfo>> = None;
        let mut instrument_bag: Option<Vec<u16>> = None;
        let mut instrument_generators: Option<Vec<Generator>> = None;
        let mut sample_headers: Option<Vec<SampleHeader>> = None;

        while reader.bytes_read() < end {
            let id = BinaryReader::read_four_cc(reader)?;
            let size = BinaryReader::read_i32(reader)? as usize;

            if id == "phdr" {
                preset_infos = Some(read_preset_infos(reader, size)?);
            } else if id == "pbag" {
                preset_bag = Some(read_bag(reader, size)?);
            } else if id == "pmod" {
                discard(reader, size)?;
            } else if id == "pgen" {
                preset_generators = Some(read_generators(reader, size)?);
            } else if id == "inst" {
                instrument_infos = Some(read_instrument_infos(reader, size)?);
            } else if id == "ibag" {
                instrument_bag = Some(read_bag(reader, size)?);
            } else if id == "imod" {
                discard(reader, size)?;
            } else if id == "igen" {
                instrument_generators = Some(read_generators(reader, size)?);
            } else if id == "shdr" {
                sample_headers = Some(SampleHeader::read_from_chunk(reader, size)?);
            } else {
                return Err(SoundFontError::ListContainsUnknownId(id));
            }
        }

        let preset_infos = preset_infos.ok_or(SoundFontError::InvalidPresetList)?;
        let preset_bag = preset_bag.ok_or(SoundFontError::InvalidPresetList)?;
        let preset_generators = preset_generators.ok_or(SoundFontError::InvalidGeneratorList)?;
        let instrument_infos = instrument_infos.ok_or(SoundFontError::InvalidInstrumentList)?;
        let instrument_bag = instrument_bag.ok_or(SoundFontError::InvalidInstrumentList)?;
        let instrument_generators =
            instrument_generators.ok_or(SoundFontError::InvalidGeneratorList)?;
        let sample_headers = sample_headers.ok_or(SoundFontError::InvalidSampleHeaderList)?;

        let preset_zones = Zone::create(&preset_bag, &preset_generators)?;
        let instrument_zones = Zone::create(&instrument_bag, &instrument_generators)?;

        let instruments =
            Instrument::create(&instrument_infos, &instrument_zones, &sample_headers)?;
        let presets = Preset::create(&preset_infos, &preset_zones, instruments.len())?;

        Ok(Self {
            sample_headers,
            instruments,
            presets,
        })
    }
}

fn discard<R: Read>(reader: &mut R, size: usize) -> Result<(), SoundFontError> {
    let mut buf = vec![0_u8; size];
    reader.read_exact(&mut buf)?;
    Ok(())
}

fn read_bag<R: Read>(reader: &mut R, size: usize) -> Result<Vec<u16>, SoundFontError> {
    if size % 4 != 0 {
        return Err(SoundFontError::InvalidChunkSize {
            chunk: "bag?".into(),
            size,
            unit: 4,
        });
    }
    let count = size / 4;
    let mut generator_index = Vec::with_capacity(count);
    for _ in 0..count {
        generator_index.push(BinaryReader::read_u16(reader)?);
        BinaryReader::read_u16(reader)?; // modulator index, unused: modulators are not evaluated
    }
    Ok(generator_index)
}

fn read_generators<R: Read>(reader: &mut R, size: usize) -> Result<Vec<Generator>, SoundFontError> {
    if size % Generator::SIZE != 0 {
        return Err(SoundFontError::InvalidChunkSize {
            chunk: "pgen/igen".into(),
            size,
            unit: Generator::SIZE,
        });
    }
    let count = size / Generator::SIZE;
    let mut generators = Vec::with_capacity(count);
    for _ in 0..count {
        generators.push(Generator::read(reader)?);
    }
    Ok(generators)
}

fn read_preset_infos<R: Read>(
    reader: &mut R,
    size: usize,
) -> Result<Vec<PresetInfo>, SoundFontError> {
    const RECORD_SIZE: usize = 38;
    if size % RECORD_SIZE != 0 {
        return Err(SoundFontError::InvalidChunkSize {
            chunk: "phdr".into(),
            size,
            unit: RECORD_SIZE,
        });
    }
    let count = size / RECORD_SIZE;

    let mut names = Vec::with_capacity(count);
    let mut patch_numbers = Vec::with_capacity(count);
    let mut bank_numbers = Vec::with_capacity(count);
    let mut zone_start_indexes = Vec::with_capacity(count);
    let mut libraries = Vec::with_capacity(count);
    let mut genres = Vec::with_capacity(count);
    let mut morphologies = Vec::with_capacity(count);

    for _ in 0..count {
        names.push(BinaryReader::read_fixed_length_string(reader, 20)?);
        patch_numbers.push(BinaryReader::read_u16(reader)? as i32);
        bank_numbers.push(BinaryReader::read_u16(reader)? as i32);
        zone_start_indexes.push(BinaryReader::read_u16(reader)? as i32);
        libraries.push(BinaryReader::read_i32(reader)?);
        genres.push(BinaryReader::read_i32(reader)?);
        morphologies.push(BinaryReader::read_i32(reader)?);
    }

    let mut infos = Vec::with_capacity(count);
    for i in 0..count {
        let zone_end_index = if i + 1 < count {
            zone_start_indexes[i + 1] - 1
        } else {
            zone_start_indexes[i] - 1
        };
        infos.push(PresetInfo {
            name: names[i].clone(),
            patch_number: patch_numbers[i],
            bank_number: bank_numbers[i],
            zone_start_index: zone_start_indexes[i],
            zone_end_index,
            library: libraries[i],
            genre: genres[i],
            morphology: morphologies[i],
        });
    }
    Ok(infos)
}

fn read_instrument_infos<R: Read>(
    reader: &mut R,
    size: usize,
) -> Result<Vec<InstrumentInfo>, SoundFontError> {
    const RECORD_SIZE: usize = 22;
    if size % RECORD_SIZE != 0 {
        return Err(SoundFontError::InvalidChunkSize {
            chunk: "inst".into(),
            size,
            unit: RECORD_SIZE,
        });
    }
    let count = size / RECORD_SIZE;

    let mut names = Vec::with_capacity(count);
    let mut zone_start_indexes = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(BinaryReader::read_fixed_length_string(reader, 20)?);
        zone_start_indexes.push(BinaryReader::read_u16(reader)? as i32);
    }

    let mut infos = Vec::with_capacity(count);
    for i in 0..count {
        let zone_end_index = if i + 1 < count {
            zone_start_indexes[i + 1] - 1
        } else {
            zone_start_indexes[i] - 1
        };
        infos.push(InstrumentInfo {
            name: names[i].clone(),
            zone_start_index: zone_start_indexes[i],
            zone_end_index,
        });
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator_type::GeneratorType;
    use std::io::Cursor;

    fn pgen_record(generator_type: GeneratorType, value: i16) -> [u8; 4] {
        let mut buf = [0_u8; 4];
        buf[0..2].copy_from_slice(&(generator_type as u16).to_le_bytes());
        buf[2..4].copy_from_slice(&value.to_le_bytes());
        buf
    }

    #[test]
    fn parses_a_single_preset_instrument_sample_chain() {
        let mut pdta = Vec::new();
        pdta.extend_from_slice(b"pdta");

        // phdr: one real preset + terminator.
        let mut phdr = Vec::new();
        for (name, patch, bank, bag) in [("Piano", 0_u16, 0_u16, 0_u16), ("EOP", 0, 0, 1)] {
            let mut name_buf = [0_u8; 20];
            name_buf[..name.len()].copy_from_slice(name.as_bytes());
            phdr.extend_from_slice(&name_buf);
            phdr.extend_from_slice(&patch.to_le_bytes());
            phdr.extend_from_slice(&bank.to_le_bytes());
            phdr.extend_from_slice(&bag.to_le_bytes());
            phdr.extend_from_slice(&0_i32.to_le_bytes());
            phdr.extend_from_slice(&0_i32.to_le_bytes());
            phdr.extend_from_slice(&0_i32.to_le_bytes());
        }
        pdta.extend_from_slice(b"phdr");
        pdta.extend_from_slice(&(phdr.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&phdr);

        // pbag: one bag pointing at generator 0, plus terminator.
        let mut pbag = Vec::new();
        for gen_index in [0_u16, 1] {
            pbag.extend_from_slice(&gen_index.to_le_bytes());
            pbag.extend_from_slice(&0_u16.to_le_bytes());
        }
        pdta.extend_from_slice(b"pbag");
        pdta.extend_from_slice(&(pbag.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&pbag);

        pdta.extend_from_slice(b"pmod");
        pdta.extend_from_slice(&0_i32.to_le_bytes());

        // pgen: a single Instrument generator pointing at instrument 0.
        let mut pgen = Vec::new();
        pgen.extend_from_slice(&pgen_record(GeneratorType::Instrument, 0));
        pdta.extend_from_slice(b"pgen");
        pdta.extend_from_slice(&(pgen.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&pgen);

        // inst: one real instrument + terminator.
        let mut inst = Vec::new();
        for (name, bag) in [("Piano-C4", 0_u16), ("EOI", 1)] {
            let mut name_buf = [0_u8; 20];
            name_buf[..name.len()].copy_from_slice(name.as_bytes());
            inst.extend_from_slice(&name_buf);
            inst.extend_from_slice(&bag.to_le_bytes());
        }
        pdta.extend_from_slice(b"inst");
        pdta.extend_from_slice(&(inst.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&inst);

        let mut ibag = Vec::new();
        for gen_index in [0_u16, 1] {
            ibag.extend_from_slice(&gen_index.to_le_bytes());
            ibag.extend_from_slice(&0_u16.to_le_bytes());
        }
        pdta.extend_from_slice(b"ibag");
        pdta.extend_from_slice(&(ibag.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&ibag);

        pdta.extend_from_slice(b"imod");
        pdta.extend_from_slice(&0_i32.to_le_bytes());

        let mut igen = Vec::new();
        igen.extend_from_slice(&pgen_record(GeneratorType::SampleId, 0));
        pdta.extend_from_slice(b"igen");
        pdta.extend_from_slice(&(igen.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&igen);

        // shdr: one real sample + terminator.
        let mut shdr = Vec::new();
        let mut name_buf = [0_u8; 20];
        name_buf[..2].copy_from_slice(b"C4");
        shdr.extend_from_slice(&name_buf);
        shdr.extend_from_slice(&0_u32.to_le_bytes()); // start
        shdr.extend_from_slice(&4_u32.to_le_bytes()); // end
        shdr.extend_from_slice(&0_u32.to_le_bytes()); // start_loop
        shdr.extend_from_slice(&4_u32.to_le_bytes()); // end_loop
        shdr.extend_from_slice(&44100_u32.to_le_bytes());
        shdr.push(60); // original_pitch
        shdr.push(0); // pitch_correction
        shdr.extend_from_slice(&0_u16.to_le_bytes()); // sample_link
        shdr.extend_from_slice(&1_u16.to_le_bytes()); // sample_type: mono
        shdr.extend_from_slice(&[0_u8; 20]); // terminator record
        shdr.extend_from_slice(&[0_u8; 20]);
        shdr.extend_from_slice(&[0_u8; 6]);
        pdta.extend_from_slice(b"shdr");
        pdta.extend_from_slice(&(shdr.len() as i32).to_le_bytes());
        pdta.extend_from_slice(&shdr);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&(pdta.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&pdta);

        let mut cur = Cursor::new(bytes);
        let params = SoundFontParameters::new(&mut cur).unwrap();
        assert_eq!(params.sample_headers.len(), 1);
        assert_eq!(params.instruments.len(), 1);
        assert_eq!(params.presets.len(), 1);
        assert_eq!(params.presets[0].name, "Piano");
    }
}
