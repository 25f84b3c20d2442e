//! Raw 2.4 GHz link for the broadcast replay.
//!
//! The nRF52840 RADIO peripheral runs in IEEE 802.15.4 mode without a
//! SoftDevice.  Logical channels 1..=14 are mapped onto 802.15.4 channels
//! by a fixed offset.  `try_send` resolving is the send-completion
//! notification: a busy channel or any other on-air outcome still counts
//! as a finished attempt, since nobody acknowledges the frame anyway.

use defmt::{debug, info};
use embassy_nrf::radio::ieee802154::{Packet, Radio};
use embassy_nrf::radio::Instance;
use wizmote::config::{CHANNEL_COUNT, LINK_CHANNEL_OFFSET};
use wizmote::message::FRAME_LEN;
use wizmote::Error;

/// Transmit power (dBm).
const TX_POWER_DBM: i8 = 8;

pub struct LinkRadio<'d, T: Instance> {
    radio: Radio<'d, T>,
    channel: u8,
}

impl<'d, T: Instance> LinkRadio<'d, T> {
    pub fn new(mut radio: Radio<'d, T>) -> Self {
        radio.set_transmission_power(TX_POWER_DBM);
        info!("Radio: 802.15.4 link up at {} dBm", TX_POWER_DBM);
        Self { radio, channel: 1 }
    }
}

impl<T: Instance> wizmote::broadcast::Radio for LinkRadio<'_, T> {
    fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        if !(1..=CHANNEL_COUNT).contains(&channel) {
            return Err(Error::Channel(channel));
        }
        self.radio.set_channel(channel + LINK_CHANNEL_OFFSET);
        self.channel = channel;
        Ok(())
    }

    async fn transmit(&mut self, payload: &[u8]) -> Result<(), Error> {
        if payload.len() != FRAME_LEN {
            return Err(Error::Transmit {
                channel: self.channel,
            });
        }

        let mut packet = Packet::new();
        packet.copy_from_slice(payload);

        if self.radio.try_send(&mut packet).await.is_err() {
            debug!("Radio: ch {} attempt ended without a clean send", self.channel);
        }
        Ok(())
    }
}
