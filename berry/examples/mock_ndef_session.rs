// Walk through a full Mifare Classic session against the simulated MFRC522:
// discover, authenticate, read, write an NDEF URI, halt.
//
// Run with `RUST_LOG=debug cargo run --example mock_ndef_session`.

use berry::prelude::*;
use berry::protocol::mifare;
use berry::transport::mock::{MockDelay, MockRegisterBus, TagReply};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let bus = MockRegisterBus::new();
    let mut dev = DeviceBuilder::new()
        .with_rc522(bus.clone(), MockDelay::new())
        .build()?;

    // Script one Mifare Classic 1K in the field
    let uid = [0xDE, 0xAD, 0xBE, 0xEF];
    bus.push_reply(TagReply::bytes(&[0x04, 0x00]));
    let mut anticoll = uid.to_vec();
    anticoll.push(mifare::bcc(&uid));
    bus.push_reply(TagReply::bytes(&anticoll));
    bus.push_reply(TagReply::with_crc(&[0x08]));

    let Some(mut tag) = dev.discover()? else {
        println!("no tag in field");
        return Ok(());
    };
    println!("found {:?} tag, uid {}", tag.family(), tag.uid());

    dev.authenticate(&mut tag, 4, KeyType::A, &MifareKey::DEFAULT)?;

    bus.push_reply(TagReply::with_crc(&[0u8; 16]));
    let block = dev.read_block(&tag, 4)?;
    println!("block 4: {}", block.to_hex());

    // Each block write is acknowledged twice
    for _ in 0..8 {
        bus.push_reply(TagReply::nibble(mifare::ACK_NIBBLE));
    }
    dev.write_ndef_uri(&tag, 0x04, b"example.com")?;
    println!("uri written to sector 1");

    dev.halt(tag)?;
    Ok(())
}
